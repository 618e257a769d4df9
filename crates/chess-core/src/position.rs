//! FEN, UCI and SAN helpers around `shakmaty::Chess`.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Rank, Square};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal move '{uci}' in {fen}")]
    IllegalMove { uci: String, fen: String },
}

/// Parse a FEN string into a legal standard-chess position
pub fn parse_fen(fen: &str) -> Result<Chess, PositionError> {
    let invalid = |reason: String| PositionError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))
}

/// Render a position as FEN
pub fn fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Parse a UCI move string and check it is legal in `pos`
pub fn parse_uci_move(pos: &Chess, uci: &str) -> Result<Move, PositionError> {
    let illegal = || PositionError::IllegalMove {
        uci: uci.to_string(),
        fen: fen(pos),
    };
    let uci_move: UciMove = uci.parse().map_err(|_| illegal())?;
    uci_move.to_move(pos).map_err(|_| illegal())
}

/// Play a UCI move on a copy of `pos`
pub fn play_uci(pos: &Chess, uci: &str) -> Result<Chess, PositionError> {
    let mv = parse_uci_move(pos, uci)?;
    pos.clone().play(mv).map_err(|_| PositionError::IllegalMove {
        uci: uci.to_string(),
        fen: fen(pos),
    })
}

/// Standard algebraic notation of a legal move
pub fn san(pos: &Chess, mv: &Move) -> String {
    San::from_move(pos, mv.clone()).to_string()
}

/// Move number prefix: "12." with white to move, "12..." with black to move
pub fn fullmove_string(pos: &Chess) -> String {
    match pos.turn() {
        Color::White => format!("{}.", pos.fullmoves()),
        Color::Black => format!("{}...", pos.fullmoves()),
    }
}

/// Plain-text board, rank 8 first, '.' for empty squares
pub fn board_diagram(board: &Board) -> String {
    let mut rows = Vec::with_capacity(8);
    for rank in Rank::ALL.iter().rev() {
        let row: Vec<String> = File::ALL
            .iter()
            .map(|&file| match board.piece_at(Square::from_coords(file, *rank)) {
                Some(piece) => piece.char().to_string(),
                None => ".".to_string(),
            })
            .collect();
        rows.push(row.join(" "));
    }
    rows.join("\n")
}
