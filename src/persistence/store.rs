//! Leaderboard stores

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::{PersistError, PersistResult};
use crate::highscores::{Leaderboard, ScoreRecord};

/// Somewhere a leaderboard can be loaded from and saved to
pub trait LeaderboardStore {
    fn load(&self) -> PersistResult<Leaderboard>;
    fn save(&self, leaderboard: &Leaderboard) -> PersistResult<()>;
}

/// Leaderboard kept as a JSON array of `{score, timestamp}` records
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> PersistResult<Leaderboard> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", self.path.display());
                return Ok(Leaderboard::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let entries: Vec<ScoreRecord> =
            serde_json::from_str(&json).map_err(|source| PersistError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let mut leaderboard = Leaderboard { entries };
        leaderboard.normalize();
        log::info!("Loaded {} high scores", leaderboard.len());
        Ok(leaderboard)
    }

    fn save(&self, leaderboard: &Leaderboard) -> PersistResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(&leaderboard.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        log::info!("High scores saved ({} entries)", leaderboard.len());
        Ok(())
    }
}

/// In-memory store for headless runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Leaderboard>,
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> PersistResult<Leaderboard> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, leaderboard: &Leaderboard) -> PersistResult<()> {
        *self
            .saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = leaderboard.clone();
        Ok(())
    }
}
