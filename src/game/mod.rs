//! Game modes.

mod classic;
mod infinity;

pub use classic::{ClassicGame, ClassicPhase, ROUND_LENGTH, STARTING_LIVES};
pub use infinity::{InfinityGame, InfinityPhase, PREFETCH_THRESHOLD};
