use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{Leaderboard, LeaderboardEntry};

use super::store::KeyValueStore;

pub const TOKEN_KEY: &str = "quizToken";
pub const HIGH_SCORE_KEY: &str = "quizHighScore";
pub const LEADERBOARD_KEY: &str = "quizLeaderboard";

/// Maximum number of leaderboard entries kept on disk.
pub const LEADERBOARD_LIMIT: usize = 100;

/// Typed access to the persisted player progress.
#[derive(Clone)]
pub struct Progress {
    store: Arc<dyn KeyValueStore>,
}

impl Progress {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// Stored high score; missing or unparsable values read as zero.
    pub fn high_score(&self) -> u32 {
        self.store
            .get(HIGH_SCORE_KEY)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Saves `streak` if it beats the stored high score. Returns whether it did.
    pub fn record_streak(&self, streak: u32) -> Result<bool, StoreError> {
        if streak <= self.high_score() {
            return Ok(false);
        }
        self.store.set(HIGH_SCORE_KEY, &streak.to_string())?;
        debug!(high_score = streak, "New high score saved");
        Ok(true)
    }

    pub fn leaderboard(&self) -> Leaderboard {
        let Some(json) = self.store.get(LEADERBOARD_KEY) else {
            return Leaderboard::default();
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
            Ok(entries) => Leaderboard::new(entries),
            Err(e) => {
                warn!(error = %e, "Failed to parse leaderboard, starting empty");
                Leaderboard::default()
            }
        }
    }

    pub fn record_result(&self, entry: LeaderboardEntry) -> Result<Leaderboard, StoreError> {
        let mut board = self.leaderboard();
        board.insert(entry, LEADERBOARD_LIMIT);
        let json = serde_json::to_string(board.entries())?;
        self.store.set(LEADERBOARD_KEY, &json)?;
        Ok(board)
    }
}
