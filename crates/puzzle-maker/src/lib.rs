//! Chess puzzle line builder.
//!
//! Walks forward from a position with an analysis engine choosing each side's
//! best move, and judges whether the line stays forced and unambiguous enough
//! to be a `Mate` or `Material` puzzle.

pub mod candidate;
pub mod chain;
pub mod completeness;
pub mod config;
pub mod engine;
pub mod error;
pub mod puzzle;

pub use candidate::{AmbiguityPolicy, CandidateMove, ScoreGapPolicy};
pub use chain::{AnalysisChain, AnalysisLink, BestMove, Category};
pub use completeness::{material_gain_qualifies, MaterialOutcome, MaterialThresholds};
pub use config::PuzzlerConfig;
pub use engine::{AnalysisEngine, MultiPvSession, PvLine, SearchResult, UciEngine};
pub use error::PuzzleError;
pub use puzzle::{Puzzle, PuzzleSummary};
