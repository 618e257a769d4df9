//! Material counting on top of shakmaty boards

use shakmaty::{Board, Color, Role};

// Piece values for material calculation
pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;

/// Piece value (no king)
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => 0,
    }
}

/// Total material value for one side
pub fn side_material(board: &Board, color: Color) -> i32 {
    Role::ALL
        .iter()
        .map(|&role| {
            let count = (board.by_color(color) & board.by_role(role)).count() as i32;
            count * piece_value(role)
        })
        .sum()
}

/// Signed material balance: positive when white is ahead
pub fn material_difference(board: &Board) -> i32 {
    side_material(board, Color::White) - side_material(board, Color::Black)
}

/// Number of pieces on the board, kings and pawns included
pub fn material_count(board: &Board) -> u32 {
    board.occupied().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::parse_fen;
    use shakmaty::{Chess, Position};

    #[test]
    fn test_starting_position_is_balanced() {
        let pos = Chess::default();
        assert_eq!(material_difference(pos.board()), 0);
        assert_eq!(material_count(pos.board()), 32);
        assert_eq!(side_material(pos.board(), Color::White), 39);
    }

    #[test]
    fn test_white_up_a_knight() {
        let pos = parse_fen("4k3/pppp4/8/8/8/8/PPPP4/N3K3 w - - 0 1").unwrap();
        assert_eq!(material_difference(pos.board()), 3);
        assert_eq!(material_count(pos.board()), 11);
    }

    #[test]
    fn test_black_up_a_rook() {
        let pos = parse_fen("r3k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(material_difference(pos.board()), -5);
        assert_eq!(material_count(pos.board()), 3);
    }
}
