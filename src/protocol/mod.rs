//! Open Trivia Database protocol.

mod messages;

pub use messages::*;
