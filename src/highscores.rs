//! High score tracking
//!
//! The stored best is read once when the game starts. A score is written back
//! only when it beats that best; storage failures are logged and never reach
//! gameplay.

use crate::persistence::{HighScoreRecord, ScoreStorage};

/// Best score across sessions, backed by a [`ScoreStorage`]
#[derive(Debug)]
pub struct HighScores<S> {
    storage: S,
    best: u64,
}

impl<S: ScoreStorage> HighScores<S> {
    /// Read the stored best. Missing or unreadable records count as 0.
    pub fn load(storage: S) -> Self {
        let best = match storage.read() {
            Ok(Some(record)) => {
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score: {}", e);
                0
            }
        };
        Self { storage, best }
    }

    pub fn high_score(&self) -> u64 {
        self.best
    }

    /// Check if a score would set a new record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it beats the best. Returns true for a new record.
    ///
    /// The in-memory best is raised even when the write fails, so the HUD
    /// still shows the record for the rest of the session.
    pub fn save(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        match self.storage.write(&HighScoreRecord { high_score: score }) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("Failed to save high score {}: {}", score, e),
        }
        true
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use proptest::prelude::*;

    #[test]
    fn test_empty_storage_loads_zero() {
        let scores = HighScores::load(MemoryStorage::new());
        assert_eq!(scores.high_score(), 0);
    }

    #[test]
    fn test_unreadable_storage_loads_zero() {
        let scores = HighScores::load(MemoryStorage::with_record(900).failing_reads());
        assert_eq!(scores.high_score(), 0);
    }

    #[test]
    fn test_lower_score_is_not_written() {
        let mut scores = HighScores::load(MemoryStorage::with_record(300));
        assert!(!scores.save(300));
        assert!(!scores.save(120));
        assert_eq!(scores.storage().writes(), 0);
        assert_eq!(scores.high_score(), 300);
    }

    #[test]
    fn test_higher_score_is_written() {
        let mut scores = HighScores::load(MemoryStorage::with_record(300));
        assert!(scores.save(310));
        assert_eq!(scores.storage().writes(), 1);
        assert_eq!(
            scores.storage().record(),
            Some(HighScoreRecord { high_score: 310 })
        );
    }

    #[test]
    fn test_failed_write_is_dropped() {
        let mut scores = HighScores::load(MemoryStorage::with_record(10).failing_writes());
        assert!(scores.save(50));
        assert_eq!(scores.high_score(), 50);
        assert_eq!(
            scores.storage().record(),
            Some(HighScoreRecord { high_score: 10 })
        );
    }

    proptest! {
        #[test]
        fn save_then_load_is_max(previous in proptest::option::of(0u64..1_000_000), score in 0u64..1_000_000) {
            let storage = match previous {
                Some(p) => MemoryStorage::with_record(p),
                None => MemoryStorage::new(),
            };
            let mut scores = HighScores::load(storage);
            scores.save(score);

            let reloaded = HighScores::load(scores.into_storage());
            prop_assert_eq!(reloaded.high_score(), score.max(previous.unwrap_or(0)));
        }
    }
}
