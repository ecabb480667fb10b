//! Error types
//!
//! The simulation tick itself cannot fail. Errors only surface at the edges:
//! refusing to start a run with a bad viewport, or a host collaborator
//! (renderer, storage) misbehaving, which the core logs and then ignores.

use std::io;

/// Invalid run configuration. Runs refuse to start with one of these.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Viewport width must be at least {min}, got {width}")]
    ViewportTooNarrow { width: f32, min: f32 },

    #[error("Viewport height must be positive, got {0}")]
    InvalidHeight(f32),
}

/// Failure reported by the presentation collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PresenterError {
    #[error("Unknown presentation handle: {0}")]
    UnknownHandle(u64),

    #[error("Presenter failure: {0}")]
    Other(String),
}

/// High score / settings storage failure.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
