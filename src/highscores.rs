//! High score persistence
//!
//! A single number under a fixed key. Loaded when a run starts, saved whenever
//! a run beats it and once more when the run ends. A missing or unreadable
//! value counts as 0; write failures are logged and the game carries on.

use crate::error::StorageError;

/// Storage key shared by every backend
pub const STORAGE_KEY: &str = "snoo-jump-high-score";

/// Backend for the persisted high score
pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&mut self) -> Result<Option<u64>, StorageError>;

    fn save(&mut self, score: u64) -> Result<(), StorageError>;
}

/// Stored high score, or 0 if absent/unreadable
pub fn load_high_score(store: &mut dyn HighScoreStore) -> u64 {
    match store.load() {
        Ok(Some(score)) => {
            log::info!("Loaded high score {}", score);
            score
        }
        Ok(None) => {
            log::info!("No high score found, starting fresh");
            0
        }
        Err(e) => {
            log::warn!("Could not read high score, using 0: {}", e);
            0
        }
    }
}

/// Persist, logging failures instead of returning them
pub fn save_high_score(store: &mut dyn HighScoreStore, score: u64) {
    match store.save(score) {
        Ok(()) => log::debug!("High score {} saved", score),
        Err(e) => log::warn!("Could not save high score {}: {}", score, e),
    }
}

/// Parse the stored text form (a bare decimal integer)
pub fn parse_stored(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

/// In-memory store (tests, hosts without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score),
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<u64>, StorageError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        self.value = Some(score);
        self.saves += 1;
        Ok(())
    }
}
