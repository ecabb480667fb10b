//! Host configuration
//!
//! Viewport geometry plus a few knobs for the headless runner. Stored as JSON
//! next to the binary on native; the web host builds one from the canvas size.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{PLATFORM_MIN_X, PLATFORM_RIGHT_INSET};
use crate::error::{ConfigError, StorageError};

/// Narrowest viewport that still leaves room for a platform x range
pub const MIN_VIEWPORT_WIDTH: f32 = PLATFORM_MIN_X + PLATFORM_RIGHT_INSET;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Viewport width in world units
    pub width: f32,
    /// Viewport height in world units
    pub height: f32,
    /// Fixed seed for every run (fresh random seed per run when absent)
    pub seed: Option<u64>,
    /// Ticks the headless demo runs for
    pub demo_ticks: u32,
    /// Where the native build keeps the high score
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            seed: None,
            demo_ticks: 60 * 60,
            high_score_path: PathBuf::from("snoo-jump-high-score.json"),
        }
    }
}

impl Settings {
    /// Settings with a specific viewport and defaults for everything else
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Reject viewports the level generator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_viewport(self.width, self.height)
    }

    /// Load settings from a JSON file; a missing file yields defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared by `Settings::validate` and mid-run resizes
pub fn validate_viewport(width: f32, height: f32) -> Result<(), ConfigError> {
    if !width.is_finite() || width < MIN_VIEWPORT_WIDTH {
        return Err(ConfigError::ViewportTooNarrow {
            width,
            min: MIN_VIEWPORT_WIDTH,
        });
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(ConfigError::InvalidHeight(height));
    }
    Ok(())
}
