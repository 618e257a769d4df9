//! Chess rules helpers shared by the puzzle tooling: FEN/UCI/SAN plumbing,
//! material counting and engine score handling.

pub mod material;
pub mod position;
pub mod score;

pub use material::{material_count, material_difference};
pub use position::PositionError;
pub use score::{normalize_score, Score};
