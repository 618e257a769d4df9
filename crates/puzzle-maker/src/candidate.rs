//! Candidate moves and the ambiguity policy that judges them

use chess_core::Score;
use serde::{Deserialize, Serialize};

/// One of the engine's top moves for a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMove {
    pub move_uci: String,
    pub move_san: String,
    /// Score from the side to move's perspective, as the engine reported it
    pub evaluation: Score,
}

/// Decides whether a ranked set of evaluations has more than one good move.
///
/// Implementations must be pure: the same scores always give the same answer.
/// Scores arrive best first, from the mover's perspective.
pub trait AmbiguityPolicy {
    fn is_ambiguous(&self, evaluations: &[Score]) -> bool;
}

impl<F> AmbiguityPolicy for F
where
    F: Fn(&[Score]) -> bool,
{
    fn is_ambiguous(&self, evaluations: &[Score]) -> bool {
        self(evaluations)
    }
}

/// Default policy: a line is ambiguous when the runner-up also wins, or when
/// a mover who isn't losing has no move clearly better than the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGapPolicy {
    /// Best move must beat the second by at least this many centipawns
    pub min_gap_cp: i32,
    /// A second move scoring at least this much is a valid alternative
    pub winning_cp: i32,
}

impl Default for ScoreGapPolicy {
    fn default() -> Self {
        Self {
            min_gap_cp: 100,
            winning_cp: 200,
        }
    }
}

impl AmbiguityPolicy for ScoreGapPolicy {
    fn is_ambiguous(&self, evaluations: &[Score]) -> bool {
        let (best, second) = match evaluations {
            [best, second, ..] => (*best, *second),
            _ => return false,
        };

        match best {
            Score::Mate(m) if m > 0 => second.is_winning_mate(),
            Score::Mate(_) => false,
            Score::Cp(best_cp) => match second {
                Score::Mate(m) => m > 0,
                Score::Cp(second_cp) => {
                    second_cp >= self.winning_cp
                        || (best_cp >= 0 && best_cp - second_cp < self.min_gap_cp)
                }
            },
        }
    }
}
