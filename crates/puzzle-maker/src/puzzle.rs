//! Puzzle generation request: a starting position, the move that sets the
//! puzzle up, and the analysis chain built from it

use chess_core::position;
use serde::{Deserialize, Serialize};
use shakmaty::{CastlingMode, Chess, Color, Move, Position};
use tracing::info;

use crate::candidate::{AmbiguityPolicy, ScoreGapPolicy};
use crate::chain::{AnalysisChain, Category};
use crate::config::PuzzlerConfig;
use crate::engine::AnalysisEngine;
use crate::error::PuzzleError;

/// Serializable result of a generated puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSummary {
    /// Position before the setup move
    pub initial_fen: String,
    /// Setup move (usually the opponent's mistake), UCI
    pub initial_move: String,
    pub category: Category,
    /// Solution line in UCI, solver move first
    pub solution: Vec<String>,
    /// Same line in SAN
    pub solution_san: Vec<String>,
    pub complete: bool,
}

impl PuzzleSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub struct Puzzle<P = ScoreGapPolicy> {
    initial_position: Chess,
    initial_move: Move,
    chain: AnalysisChain<P>,
    search_depth: u32,
}

impl Puzzle<ScoreGapPolicy> {
    pub fn new(position: Chess, initial_move: Move, config: &PuzzlerConfig) -> Result<Self, PuzzleError> {
        Self::with_policy(position, initial_move, config, ScoreGapPolicy::default())
    }

    /// Build from a FEN and a UCI setup move
    pub fn from_fen(fen: &str, initial_move: &str, config: &PuzzlerConfig) -> Result<Self, PuzzleError> {
        let position = position::parse_fen(fen)?;
        let mv = position::parse_uci_move(&position, initial_move)?;
        Self::new(position, mv, config)
    }
}

impl<P: AmbiguityPolicy> Puzzle<P> {
    pub fn with_policy(
        position: Chess,
        initial_move: Move,
        config: &PuzzlerConfig,
        policy: P,
    ) -> Result<Self, PuzzleError> {
        let chain = AnalysisChain::with_policy(&position, initial_move.clone(), config.strict, policy)?
            .max_links(config.max_links)
            .require_checkmate(config.require_checkmate)
            .thresholds(config.thresholds);

        Ok(Self {
            initial_position: position,
            initial_move,
            chain,
            search_depth: config.search_depth,
        })
    }

    /// Run the engine over the line and log the outcome
    pub fn generate<E: AnalysisEngine + ?Sized>(&mut self, engine: &mut E) -> Result<(), PuzzleError> {
        self.chain.generate(engine, self.search_depth)?;
        info!(
            fen = %position::fen(&self.initial_position),
            category = %self.category(),
            complete = self.is_complete(),
            solution = ?self.solution(),
            "Puzzle generated"
        );
        Ok(())
    }

    pub fn chain(&self) -> &AnalysisChain<P> {
        &self.chain
    }

    pub fn initial_position(&self) -> &Chess {
        &self.initial_position
    }

    pub fn initial_move(&self) -> &Move {
        &self.initial_move
    }

    /// The side that solves the puzzle (to move after the setup move)
    pub fn solver(&self) -> Color {
        self.chain.root().position().turn()
    }

    /// Material balance the solver starts from
    pub fn initial_material_diff(&self) -> f64 {
        f64::from(self.chain.root().material_difference())
    }

    pub fn category(&self) -> Category {
        self.chain.category()
    }

    pub fn solution(&self) -> Vec<String> {
        self.chain.move_list()
    }

    pub fn is_complete(&self) -> bool {
        self.chain.is_complete(
            self.category(),
            self.solver() == Color::White,
            self.initial_material_diff(),
        )
    }

    pub fn summary(&self) -> PuzzleSummary {
        let solution = self.solution();
        let links = self.chain.links();
        let solution_san = links
            .iter()
            .zip(links.iter().skip(1))
            .take(solution.len())
            .map(|(link, next)| position::san(link.position(), next.incoming_move()))
            .collect();

        PuzzleSummary {
            initial_fen: position::fen(&self.initial_position),
            initial_move: self.initial_move.to_uci(CastlingMode::Standard).to_string(),
            category: self.category(),
            solution,
            solution_san,
            complete: self.is_complete(),
        }
    }
}
