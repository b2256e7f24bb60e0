//! Best score persistence
//!
//! A single number survives between sessions. Backends:
//! - `MemoryScoreStore`: in-process, for tests and ephemeral runs
//! - `FileScoreStore`: JSON file (native)
//! - `LocalStorageScoreStore`: browser LocalStorage (wasm)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a load or save failed
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backing storage could not be reached
    Unavailable(String),
    /// Stored value is not a score
    Malformed(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "score storage I/O error: {}", e),
            PersistError::Json(e) => write!(f, "score record is not valid JSON: {}", e),
            PersistError::Unavailable(what) => write!(f, "score storage unavailable: {}", what),
            PersistError::Malformed(value) => write!(f, "stored best score is malformed: {:?}", value),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best_score: u64,
}

/// Persistence gateway for the best score
pub trait ScoreStore {
    /// Read the stored best score; a missing value is `Ok(0)`
    fn load_best_score(&mut self) -> Result<u64, PersistError>;
    fn save_best_score(&mut self, best_score: u64) -> Result<(), PersistError>;
}

/// Keeps the score in memory and counts writes
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    pub best_score: Option<u64>,
    pub saves: u32,
    /// Make every load fail (simulates corrupt storage)
    pub fail_loads: bool,
}

impl MemoryScoreStore {
    pub fn with_best(best_score: u64) -> Self {
        Self {
            best_score: Some(best_score),
            ..Default::default()
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best_score(&mut self) -> Result<u64, PersistError> {
        if self.fail_loads {
            return Err(PersistError::Unavailable("memory store set to fail".to_string()));
        }
        Ok(self.best_score.unwrap_or(0))
    }

    fn save_best_score(&mut self, best_score: u64) -> Result<(), PersistError> {
        self.best_score = Some(best_score);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file holding a [`BestScoreRecord`]
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileScoreStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileScoreStore {
    fn load_best_score(&mut self) -> Result<u64, PersistError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: BestScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded best score {} from {}", record.best_score, self.path.display());
        Ok(record.best_score)
    }

    fn save_best_score(&mut self, best_score: u64) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(&BestScoreRecord { best_score })?;
        // Atomic replace via a sibling temp file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", best_score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage, stored as a plain number
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScoreStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "gap_runner_best_score";

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScoreStore {
    fn load_best_score(&mut self) -> Result<u64, PersistError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(value)) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| PersistError::Malformed(value)),
            Ok(None) => Ok(0),
            Err(_) => Err(PersistError::Unavailable("LocalStorage read".to_string())),
        }
    }

    fn save_best_score(&mut self, best_score: u64) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &best_score.to_string())
            .map_err(|_| PersistError::Unavailable("LocalStorage write".to_string()))?;
        log::info!("Best score {} saved", best_score);
        Ok(())
    }
}
