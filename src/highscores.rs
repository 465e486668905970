//! High score persistence
//!
//! The core persists exactly one integer under a stable key. Storage is
//! a port: the session never sees an error from it, implementations log
//! and swallow their own failures.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host-implemented score storage
pub trait ScoreStore {
    /// Read the persisted high score, if any
    fn load(&mut self) -> Option<u64>;
    /// Persist the high score; best-effort, must not fail outward
    fn store(&mut self, score: u64);
}

/// In-memory store, for tests and hosts without persistence
#[derive(Debug, Default)]
pub struct MemoryScores {
    value: Option<u64>,
}

impl MemoryScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }
}

impl ScoreStore for MemoryScores {
    fn load(&mut self) -> Option<u64> {
        self.value
    }

    fn store(&mut self, score: u64) {
        self.value = Some(score);
    }
}

/// On-disk JSON envelope for the persisted integer
#[derive(Debug, Serialize, Deserialize)]
struct SavedScore {
    high_score: u64,
}

/// JSON-file-backed store
#[derive(Debug)]
pub struct FileScores {
    path: PathBuf,
}

impl FileScores {
    /// Stable file name used when only a directory is given
    pub const FILE_NAME: &'static str = "modefall_highscore.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the stable key inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir.into().join(Self::FILE_NAME))
    }
}

impl ScoreStore for FileScores {
    fn load(&mut self) -> Option<u64> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SavedScore>(&json) {
            Ok(saved) => {
                log::info!("Loaded high score {} from {:?}", saved.high_score, self.path);
                Some(saved.high_score)
            }
            Err(err) => {
                log::warn!("Ignoring corrupt high score file {:?}: {err}", self.path);
                None
            }
        }
    }

    fn store(&mut self, score: u64) {
        let saved = SavedScore { high_score: score };
        let json = match serde_json::to_string(&saved) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Failed to serialize high score: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, json) {
            log::warn!("Failed to write high score to {:?}: {err}", self.path);
        }
    }
}
