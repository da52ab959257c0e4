pub mod loader;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::game::STARTING_LEVEL;

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub ui: UiConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Level a fresh session starts at; line-based progression adds to it.
    pub starting_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_level: STARTING_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Whether the info panel previews the queued next piece.
    pub show_next_piece: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_next_piece: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How many recent session summaries the history file retains.
    pub max_recent: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_recent: 10 }
    }
}

impl Config {
    // Force reload the configuration from file
    pub fn force_reload() -> bool {
        if let Ok(new_config) = loader::load_config_from_file() {
            if let Ok(mut config) = CONFIG.write() {
                *config = new_config;
                return true;
            }
        }
        false
    }
}
