//! Puzzle generation error types

use chess_core::PositionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine suggested illegal move {uci} in {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Analysis link {0} has no successor")]
    MissingSuccessor(usize),
}
