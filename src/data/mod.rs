mod progress;
mod store;

pub use progress::{Progress, HIGH_SCORE_KEY, LEADERBOARD_KEY, LEADERBOARD_LIMIT, TOKEN_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
