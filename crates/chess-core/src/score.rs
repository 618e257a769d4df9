//! Engine score representation (centipawns or mate distance)

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Position};

/// An engine evaluation, from the perspective it was reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    /// Centipawns
    Cp(i32),
    /// Mate in N moves (positive = the perspective side mates, negative = gets mated)
    Mate(i32),
}

impl Score {
    /// Build a score from the `cp`/`mate` fields of a UCI info line.
    /// A mate score wins when both are present.
    pub fn from_uci(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (mate, cp) {
            (Some(m), _) => Some(Score::Mate(m)),
            (None, Some(c)) => Some(Score::Cp(c)),
            (None, None) => None,
        }
    }

    pub fn is_mate(&self) -> bool {
        matches!(self, Score::Mate(_))
    }

    /// True if this is a forced mate for the perspective side
    pub fn is_winning_mate(&self) -> bool {
        matches!(self, Score::Mate(m) if *m > 0)
    }

    /// The same score seen from the other side
    pub fn flip(self) -> Self {
        match self {
            Score::Cp(c) => Score::Cp(-c),
            Score::Mate(m) => Score::Mate(-m),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Cp(c) => write!(f, "CP: {c}"),
            Score::Mate(m) => write!(f, "Mate: {m}"),
        }
    }
}

/// Convert a side-to-move score reported for `position` to White's perspective
pub fn normalize_score(position: &Chess, score: Score) -> Score {
    match position.turn() {
        Color::White => score,
        Color::Black => score.flip(),
    }
}
