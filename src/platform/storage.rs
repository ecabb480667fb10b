//! High score storage backends

use crate::error::StorageError;
use crate::highscores::HighScoreStore;
#[cfg(not(target_arch = "wasm32"))]
use serde::{Deserialize, Serialize};

/// On-disk record
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SavedHighScore {
    key: String,
    score: u64,
}

/// JSON file next to the binary. Writes go to a temp file first and are
/// renamed into place so a crash never leaves a half-written record.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<Option<u64>, StorageError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let saved: SavedHighScore = serde_json::from_str(&json)?;
        if saved.key != crate::highscores::STORAGE_KEY {
            log::warn!("Ignoring high score stored under key {:?}", saved.key);
            return Ok(None);
        }
        Ok(Some(saved.score))
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        let saved = SavedHighScore {
            key: crate::highscores::STORAGE_KEY.to_string(),
            score,
        };
        let json = serde_json::to_string_pretty(&saved)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage, stored as a bare integer string
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<Option<u64>, StorageError> {
        let storage = Self::storage()?;
        let item = storage
            .get_item(crate::highscores::STORAGE_KEY)
            .map_err(|_| StorageError::Unavailable("LocalStorage read".to_string()))?;
        Ok(item.as_deref().and_then(crate::highscores::parse_stored))
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(crate::highscores::STORAGE_KEY, &score.to_string())
            .map_err(|_| StorageError::Unavailable("LocalStorage write".to_string()))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::highscores::load_high_score;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("snoo-jump-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("round-trip");
        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap(), None);

        store.save(321).unwrap();
        assert_eq!(store.load().unwrap(), Some(321));
        assert_eq!(FileStore::new(&path).load().unwrap(), Some(321));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_zero() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let mut store = FileStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_high_score(&mut store), 0);
        std::fs::remove_file(&path).unwrap();
    }
}
