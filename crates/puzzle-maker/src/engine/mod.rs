//! Analysis engine interface and the multi-PV session guard

pub mod uci;

use chess_core::Score;
use shakmaty::Chess;
use tracing::warn;

use crate::error::PuzzleError;

pub use uci::UciEngine;

/// A single PV line from a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PvLine {
    /// Principal variation moves (UCI)
    pub pv: Vec<String>,
    /// Score from the side to move's perspective
    pub score: Option<Score>,
}

/// Result of one search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move in UCI notation, `None` when the position has no move to play
    pub best_move: Option<String>,
    /// PV lines ordered by rank (index 0 = multipv 1)
    pub lines: Vec<PvLine>,
}

impl SearchResult {
    /// Score of the principal line
    pub fn score(&self) -> Option<Score> {
        self.lines.first().and_then(|line| line.score)
    }
}

/// Synchronous, stateful engine: position and options persist between calls
pub trait AnalysisEngine {
    fn set_position(&mut self, position: &Chess) -> Result<(), PuzzleError>;

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), PuzzleError>;

    /// Search the current position to a fixed depth and wait for the result
    fn search(&mut self, depth: u32) -> Result<SearchResult, PuzzleError>;
}

/// Engine switched to multi-PV mode. Dropping the session puts the engine
/// back to a single PV, whether or not the queries succeeded.
pub struct MultiPvSession<'a, E: AnalysisEngine + ?Sized> {
    engine: &'a mut E,
}

impl<'a, E: AnalysisEngine + ?Sized> MultiPvSession<'a, E> {
    pub fn open(engine: &'a mut E, lines: usize) -> Result<Self, PuzzleError> {
        engine.set_option("MultiPV", &lines.to_string())?;
        Ok(Self { engine })
    }

    /// Search `position` and return the ranked lines
    pub fn analyse(&mut self, position: &Chess, depth: u32) -> Result<SearchResult, PuzzleError> {
        self.engine.set_position(position)?;
        self.engine.search(depth)
    }
}

impl<E: AnalysisEngine + ?Sized> Drop for MultiPvSession<'_, E> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.set_option("MultiPV", "1") {
            warn!(error = %e, "Failed to reset MultiPV to 1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records option changes; searches fail on demand
    #[derive(Default)]
    struct RecordingEngine {
        options: Vec<(String, String)>,
        fail_search: bool,
    }

    impl AnalysisEngine for RecordingEngine {
        fn set_position(&mut self, _position: &Chess) -> Result<(), PuzzleError> {
            Ok(())
        }

        fn set_option(&mut self, name: &str, value: &str) -> Result<(), PuzzleError> {
            self.options.push((name.to_string(), value.to_string()));
            Ok(())
        }

        fn search(&mut self, _depth: u32) -> Result<SearchResult, PuzzleError> {
            if self.fail_search {
                return Err(PuzzleError::Engine("search failed".into()));
            }
            Ok(SearchResult::default())
        }
    }

    fn multipv_values(engine: &RecordingEngine) -> Vec<&str> {
        engine
            .options
            .iter()
            .filter(|(name, _)| name == "MultiPV")
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[test]
    fn test_session_restores_single_pv() {
        let mut engine = RecordingEngine::default();
        {
            let mut session = MultiPvSession::open(&mut engine, 3).unwrap();
            session.analyse(&Chess::default(), 10).unwrap();
        }
        assert_eq!(multipv_values(&engine), vec!["3", "1"]);
    }

    #[test]
    fn test_session_restores_after_error() {
        let mut engine = RecordingEngine {
            fail_search: true,
            ..Default::default()
        };
        let result = MultiPvSession::open(&mut engine, 2)
            .and_then(|mut session| session.analyse(&Chess::default(), 10));
        assert!(result.is_err());
        assert_eq!(multipv_values(&engine), vec!["2", "1"]);
    }

    #[test]
    fn test_search_result_score() {
        let result = SearchResult {
            best_move: Some("e2e4".into()),
            lines: vec![PvLine {
                pv: vec!["e2e4".into()],
                score: Some(Score::Cp(30)),
            }],
        };
        assert_eq!(result.score(), Some(Score::Cp(30)));
        assert_eq!(SearchResult::default().score(), None);
    }
}
