//! High score leaderboard
//!
//! Tracks the top 10 scores. The simulation only sees the [`ScoreStore`]
//! trait; the native build persists to a JSON file in the user's data
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// Destination for final scores, handed each one on game over
pub trait ScoreStore {
    /// Record a final score; returns the rank achieved (1-indexed)
    fn submit(&mut self, score: u64, level: u32) -> Option<usize>;

    /// Entries, best first
    fn top(&self) -> &[HighScoreEntry];
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score if it qualifies, keeping the list sorted descending
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Default location: `<data dir>/astro-storm/highscores.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("astro-storm").join("highscores.json"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl ScoreStore for HighScores {
    fn submit(&mut self, score: u64, level: u32) -> Option<usize> {
        self.add_score(score, level, unix_now())
    }

    fn top(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}

/// Leaderboard backed by a JSON file, saved after every accepted score
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    scores: HighScores,
}

impl FileScoreStore {
    /// Open the leaderboard at `path`; a missing or unreadable file starts
    /// an empty board
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = if path.exists() {
            match HighScores::load_from(&path) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores from {:?}", scores.entries.len(), path);
                    scores
                }
                Err(e) => {
                    log::warn!("Failed to load high scores from {:?}: {}", path, e);
                    HighScores::new()
                }
            }
        } else {
            log::info!("No high scores file found at {:?}, starting fresh", path);
            HighScores::new()
        };
        Self { path, scores }
    }

    /// Open the leaderboard at [`HighScores::default_path`]
    pub fn open_default() -> Option<Self> {
        let Some(path) = HighScores::default_path() else {
            log::warn!("Could not determine data directory for high scores");
            return None;
        };
        Some(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for FileScoreStore {
    fn submit(&mut self, score: u64, level: u32) -> Option<usize> {
        let rank = self.scores.submit(score, level)?;
        match self.scores.save_to(&self.path) {
            Ok(()) => log::info!("Saved high scores to {:?}", self.path),
            Err(e) => log::warn!("Failed to write high scores: {}", e),
        }
        Some(rank)
    }

    fn top(&self) -> &[HighScoreEntry] {
        self.scores.top()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
