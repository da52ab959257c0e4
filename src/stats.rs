#![warn(clippy::all, clippy::pedantic)]

//! Persistence collaborator for session-end statistics. The game loop hands
//! a `SessionSummary` to the `StatsSink` and moves on; a background writer
//! thread folds it into the on-disk history file. Delivery is
//! fire-and-forget and never blocks gameplay.

use bevy_ecs::prelude::Resource;
use crossbeam_channel::Sender;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{CONFIG, HistoryConfig};

// Default history file path relative to the working directory, used only
// when no platform data directory is available
const HISTORY_FILE_PATH: &str = "blockfall_history.toml";

/// Facts emitted by the core when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub duration_seconds: u64,
}

/// Aggregate history persisted across sessions: best score, lifetime
/// totals, and the most recent session summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    pub best_score: u32,
    pub games_played: u32,
    pub total_lines: u32,
    pub recent: Vec<SessionSummary>,
}

impl History {
    /// Folds one finished session into the history, keeping at most
    /// `max_recent` summaries, newest first.
    pub fn record(&mut self, summary: SessionSummary, max_recent: usize) {
        self.best_score = self.best_score.max(summary.score);
        self.games_played += 1;
        self.total_lines += summary.lines;
        self.recent.insert(0, summary);
        self.recent.truncate(max_recent);
    }
}

/// Handle the game loop uses to emit session summaries.
#[derive(Resource, Debug, Clone)]
pub struct StatsSink {
    tx: Sender<SessionSummary>,
}

impl StatsSink {
    /// Spawns the background writer thread and returns the sending handle.
    #[must_use]
    pub fn spawn_writer() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded::<SessionSummary>();
        std::thread::spawn(move || {
            for summary in rx {
                if let Err(e) = append_summary(&summary) {
                    warn!("Failed to persist session summary: {e:?}");
                }
            }
        });
        Self { tx }
    }

    /// Sink backed by a caller-owned channel; used by tests to observe what
    /// the core emits.
    #[must_use]
    pub fn with_sender(tx: Sender<SessionSummary>) -> Self {
        Self { tx }
    }

    /// Non-blocking emit. A disconnected writer is tolerated silently: the
    /// session is over either way.
    pub fn record(&self, summary: SessionSummary) {
        let _ = self.tx.send(summary);
    }
}

/// Appends a summary to the default history file, honoring the configured
/// retention.
pub fn append_summary(summary: &SessionSummary) -> Result<(), HistoryError> {
    let max_recent = CONFIG
        .read()
        .map_or_else(
            |_| HistoryConfig::default().max_recent,
            |config| config.history.max_recent,
        )
        .max(1);
    append_summary_to(&history_file_path(), summary, max_recent)
}

/// Appends a summary to an explicit history file path.
pub fn append_summary_to(
    path: &Path,
    summary: &SessionSummary,
    max_recent: usize,
) -> Result<(), HistoryError> {
    let mut history = load_history_from(path)?;
    history.record(*summary, max_recent);
    save_history_to(path, &history)
}

/// Loads the history file; a missing file is an empty history.
pub fn load_history_from(path: &Path) -> Result<History, HistoryError> {
    if !path.exists() {
        return Ok(History::default());
    }
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

pub fn save_history_to(path: &Path, history: &History) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let toml_string = toml::to_string_pretty(history)?;
    fs::write(path, toml_string)?;
    Ok(())
}

/// Path of the history file: env override, then the platform data
/// directory, then the working directory.
#[must_use]
pub fn history_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("BLOCKFALL_HISTORY") {
        return PathBuf::from(path);
    }

    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("blockfall").join("history.toml")
    } else {
        PathBuf::from(HISTORY_FILE_PATH)
    }
}

// Custom error type for history file operations
#[derive(Debug)]
pub enum HistoryError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl From<io::Error> for HistoryError {
    fn from(err: io::Error) -> Self {
        HistoryError::Io(err)
    }
}

impl From<toml::de::Error> for HistoryError {
    fn from(err: toml::de::Error) -> Self {
        HistoryError::Parse(err)
    }
}

impl From<toml::ser::Error> for HistoryError {
    fn from(err: toml::ser::Error) -> Self {
        HistoryError::Serialize(err)
    }
}
