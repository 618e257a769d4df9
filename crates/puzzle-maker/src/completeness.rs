//! Acceptance rules for material-gain puzzles

use chess_core::Score;
use serde::{Deserialize, Serialize};

/// Material thresholds, in the units returned by `chess_core::material_difference`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialThresholds {
    /// Final balance must exceed this in the solver's favour
    pub min_advantage: f64,
    /// Final balance must differ from the starting balance by more than this
    pub min_swing: f64,
    /// Starting balance must be strictly within +-this
    pub max_initial_imbalance: f64,
    /// More than this many pieces must remain on the board
    pub min_piece_count: u32,
}

impl Default for MaterialThresholds {
    fn default() -> Self {
        Self {
            min_advantage: 0.2,
            min_swing: 0.1,
            max_initial_imbalance: 2.0,
            min_piece_count: 6,
        }
    }
}

/// What the chain looks like where a material puzzle is judged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOutcome {
    /// Signed material balance, positive = white ahead
    pub difference: f64,
    /// Pieces left on the board
    pub piece_count: u32,
    /// Engine evaluation at the judged link
    pub evaluation: Option<Score>,
}

/// Did the line win material for the solver from a roughly balanced start?
pub fn material_gain_qualifies(
    outcome: &MaterialOutcome,
    white_to_move: bool,
    initial_difference: f64,
    thresholds: &MaterialThresholds,
) -> bool {
    let solver_ahead = if white_to_move {
        outcome.difference > thresholds.min_advantage
    } else {
        outcome.difference < -thresholds.min_advantage
    };
    let swing = (outcome.difference - initial_difference).abs();
    let balanced_start = initial_difference.abs() < thresholds.max_initial_imbalance;
    let forced_mate = outcome.evaluation.is_some_and(|score| score.is_mate());

    solver_ahead
        && swing > thresholds.min_swing
        && balanced_start
        && !forced_mate
        && outcome.piece_count > thresholds.min_piece_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(difference: f64, piece_count: u32) -> MaterialOutcome {
        MaterialOutcome {
            difference,
            piece_count,
            evaluation: Some(Score::Cp(150)),
        }
    }

    #[test]
    fn test_small_gain_from_balanced_start() {
        let t = MaterialThresholds::default();
        assert!(material_gain_qualifies(&outcome(0.3, 10), true, 0.0, &t));
    }

    #[test]
    fn test_too_few_pieces() {
        let t = MaterialThresholds::default();
        assert!(!material_gain_qualifies(&outcome(0.3, 5), true, 0.0, &t));
        assert!(!material_gain_qualifies(&outcome(0.3, 6), true, 0.0, &t));
    }

    #[test]
    fn test_already_decisive_start() {
        let t = MaterialThresholds::default();
        assert!(!material_gain_qualifies(&outcome(5.0, 20), true, 2.5, &t));
        assert!(!material_gain_qualifies(&outcome(-5.0, 20), false, 2.5, &t));
        assert!(!material_gain_qualifies(&outcome(-5.0, 20), false, -2.5, &t));
    }

    #[test]
    fn test_black_solver_needs_negative_balance() {
        let t = MaterialThresholds::default();
        assert!(material_gain_qualifies(&outcome(-3.0, 12), false, 0.0, &t));
        assert!(!material_gain_qualifies(&outcome(3.0, 12), false, 0.0, &t));
    }

    #[test]
    fn test_advantage_must_be_created() {
        let t = MaterialThresholds::default();
        // Already +1 at the start and still +1: no swing
        assert!(!material_gain_qualifies(&outcome(1.0, 12), true, 1.0, &t));
    }

    #[test]
    fn test_mate_score_disqualifies() {
        let t = MaterialThresholds::default();
        let mating = MaterialOutcome {
            difference: 3.0,
            piece_count: 12,
            evaluation: Some(Score::Mate(4)),
        };
        assert!(!material_gain_qualifies(&mating, true, 0.0, &t));

        let unknown = MaterialOutcome {
            evaluation: None,
            ..mating
        };
        assert!(material_gain_qualifies(&unknown, true, 0.0, &t));
    }
}
