//! Runtime configuration stored as settings.json in the data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::PrefetchConfig;
use crate::game::ROUND_LENGTH;
use crate::protocol::{BATCH_SIZE, DEFAULT_BASE_URL};

pub const SETTINGS_FILE: &str = "settings.json";
pub const STORE_FILE: &str = "storage.json";

pub const ENV_API_URL: &str = "QUIZMASTER_API_URL";
pub const ENV_PLAYER: &str = "QUIZMASTER_PLAYER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub player_name: String,
    pub batch_size: u8,
    pub classic_length: u8,
    pub min_fetch_interval_ms: u64,
    pub retry_delay_ms: u64,
    pub max_retries: u32,
    /// How long an answer stays revealed before the next question.
    pub reveal_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            player_name: default_player_name(),
            batch_size: BATCH_SIZE,
            classic_length: ROUND_LENGTH,
            min_fetch_interval_ms: 5000,
            retry_delay_ms: 5000,
            max_retries: 3,
            reveal_delay_ms: 1500,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(config) => {
                    debug!(path = %path.display(), "Settings loaded");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    /// Applies environment overrides through `lookup` (normally `std::env::var`).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(player) = lookup(ENV_PLAYER).filter(|v| !v.trim().is_empty()) {
            self.player_name = player.trim().to_string();
        }
        self
    }

    pub fn from_env(data_dir: &Path) -> Self {
        Self::load(data_dir).with_overrides(|key| std::env::var(key).ok())
    }

    pub fn prefetch(&self) -> PrefetchConfig {
        PrefetchConfig {
            batch_size: self.batch_size.max(1),
            min_interval: Duration::from_millis(self.min_fetch_interval_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            max_retries: self.max_retries,
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizmaster")
}

fn default_player_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Player".to_string())
}
