//! High score storage backends
//!
//! Features:
//! - JSON document `{ "high_score": <integer> }`
//! - Atomic file replace (write tmp, then rename over the save)
//! - In-memory backend for tests and embedding

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted high score document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score record is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the high score lives
pub trait ScoreStorage {
    /// Read the stored record; `Ok(None)` when nothing has been saved yet
    fn read(&self) -> Result<Option<HighScoreRecord>, PersistenceError>;
    /// Replace the stored record
    fn write(&mut self, record: &HighScoreRecord) -> Result<(), PersistenceError>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ScoreStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<HighScoreRecord>, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn write(&mut self, record: &HighScoreRecord) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string(record)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process storage. Can be told to fail to exercise degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Option<HighScoreRecord>,
    fail_reads: bool,
    fail_writes: bool,
    writes: u32,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(high_score: u64) -> Self {
        Self {
            record: Some(HighScoreRecord { high_score }),
            ..Self::default()
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn record(&self) -> Option<HighScoreRecord> {
        self.record
    }

    /// Successful writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl ScoreStorage for MemoryStorage {
    fn read(&self) -> Result<Option<HighScoreRecord>, PersistenceError> {
        if self.fail_reads {
            return Err(io::Error::other("memory storage read disabled").into());
        }
        Ok(self.record)
    }

    fn write(&mut self, record: &HighScoreRecord) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(io::Error::other("memory storage write disabled").into());
        }
        self.record = Some(*record);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tulkun-persist-{}", std::process::id()));
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_reads_none() {
        let storage = JsonFileStorage::new(temp_file("missing.json"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn test_file_write_then_read() {
        let path = temp_file("roundtrip.json");
        let mut storage = JsonFileStorage::new(&path);
        assert_eq!(storage.path(), path.as_path());
        storage.write(&HighScoreRecord { high_score: 420 }).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"high_score":420}"#);
        assert_eq!(storage.read().unwrap(), Some(HighScoreRecord { high_score: 420 }));
        assert!(!storage.tmp_path().exists());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_file("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.read(), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_negative_score_is_rejected() {
        let path = temp_file("negative.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"high_score": -5}"#).unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(storage.read().is_err());
    }

    #[test]
    fn test_memory_storage_failures() {
        let mut storage = MemoryStorage::with_record(10).failing_reads().failing_writes();
        assert!(matches!(storage.read(), Err(PersistenceError::Io(_))));
        assert!(storage.write(&HighScoreRecord { high_score: 20 }).is_err());
        assert_eq!(storage.writes(), 0);
        assert_eq!(storage.record(), Some(HighScoreRecord { high_score: 10 }));
    }
}
