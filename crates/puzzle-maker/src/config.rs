//! Puzzle generation configuration from environment variables

use std::env;
use std::str::FromStr;

use tracing::info;

use crate::completeness::MaterialThresholds;
use crate::error::PuzzleError;

/// Chain length cap when none is configured
pub const DEFAULT_MAX_LINKS: usize = 40;

#[derive(Clone, Debug, PartialEq)]
pub struct PuzzlerConfig {
    /// Path to the UCI engine binary
    pub engine_path: String,

    /// Fixed search depth for every engine query
    pub search_depth: u32,

    /// Upper bound on links in one chain
    pub max_links: usize,

    /// Passed down every chain; reserved for stricter puzzle rules
    pub strict: bool,

    /// Only accept mate puzzles that end in checkmate (not any game over)
    pub require_checkmate: bool,

    /// Material-gain acceptance thresholds
    pub thresholds: MaterialThresholds,
}

impl Default for PuzzlerConfig {
    fn default() -> Self {
        Self {
            engine_path: "/usr/local/bin/stockfish".to_string(),
            search_depth: 22,
            max_links: DEFAULT_MAX_LINKS,
            strict: true,
            require_checkmate: false,
            thresholds: MaterialThresholds::default(),
        }
    }
}

impl PuzzlerConfig {
    /// Load configuration from environment variables (and a `.env` file if present).
    /// Unset variables fall back to the defaults.
    pub fn load() -> Result<Self, PuzzleError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        let engine_path = env::var("STOCKFISH_PATH").unwrap_or(defaults.engine_path);

        let search_depth = parse_var("SEARCH_DEPTH", "SEARCH_DEPTH must be a positive integer")?
            .unwrap_or(defaults.search_depth);
        if search_depth == 0 {
            return Err(PuzzleError::Config("SEARCH_DEPTH must be a positive integer"));
        }

        let max_links = parse_var("MAX_CHAIN_LINKS", "MAX_CHAIN_LINKS must be an integer")?
            .unwrap_or(defaults.max_links);
        if max_links < 2 {
            return Err(PuzzleError::Config("MAX_CHAIN_LINKS must be at least 2"));
        }

        let strict = parse_var("STRICT_PUZZLES", "STRICT_PUZZLES must be true or false")?
            .unwrap_or(defaults.strict);
        let require_checkmate =
            parse_var("REQUIRE_CHECKMATE", "REQUIRE_CHECKMATE must be true or false")?
                .unwrap_or(defaults.require_checkmate);

        let base = defaults.thresholds;
        let thresholds = MaterialThresholds {
            min_advantage: parse_var("MIN_MATERIAL_ADVANTAGE", "MIN_MATERIAL_ADVANTAGE must be a number")?
                .unwrap_or(base.min_advantage),
            min_swing: parse_var("MIN_MATERIAL_SWING", "MIN_MATERIAL_SWING must be a number")?
                .unwrap_or(base.min_swing),
            max_initial_imbalance: parse_var(
                "MAX_INITIAL_IMBALANCE",
                "MAX_INITIAL_IMBALANCE must be a number",
            )?
            .unwrap_or(base.max_initial_imbalance),
            min_piece_count: parse_var("MIN_PIECE_COUNT", "MIN_PIECE_COUNT must be an integer")?
                .unwrap_or(base.min_piece_count),
        };

        info!(
            engine_path = %engine_path,
            search_depth,
            max_links,
            strict,
            require_checkmate,
            "Puzzle config loaded"
        );

        Ok(Self {
            engine_path,
            search_depth,
            max_links,
            strict,
            require_checkmate,
            thresholds,
        })
    }
}

/// Read and parse an optional environment variable
fn parse_var<T: FromStr>(name: &str, message: &'static str) -> Result<Option<T>, PuzzleError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PuzzleError::Config(message)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PuzzlerConfig::default();
        assert_eq!(config.search_depth, 22);
        assert_eq!(config.max_links, 40);
        assert!(config.strict);
        assert!(!config.require_checkmate);
        assert_eq!(config.thresholds.min_piece_count, 6);
    }

    #[test]
    fn test_parse_var_missing_and_invalid() {
        let missing: Option<u32> =
            parse_var("PUZZLE_MAKER_TEST_UNSET_VAR", "unused").unwrap();
        assert_eq!(missing, None);

        env::set_var("PUZZLE_MAKER_TEST_BAD_DEPTH", "deep");
        let bad: Result<Option<u32>, _> = parse_var("PUZZLE_MAKER_TEST_BAD_DEPTH", "bad depth");
        assert!(matches!(bad, Err(PuzzleError::Config("bad depth"))));

        env::set_var("PUZZLE_MAKER_TEST_GOOD_DEPTH", " 18 ");
        let good: Option<u32> = parse_var("PUZZLE_MAKER_TEST_GOOD_DEPTH", "unused").unwrap();
        assert_eq!(good, Some(18));
    }
}
