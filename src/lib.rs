//! Snoo Jump - an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Per-tick simulation (physics, generation, collisions, run state)
//! - `game`: Scene flow around the simulation (title, run, game over)
//! - `highscores`: High score persistence
//! - `settings`: Viewport and host configuration
//! - `platform`: Native/browser storage backends
//! - `web`: wasm32 host binding

pub mod error;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, PresenterError, StorageError};
pub use game::{Game, HostInput, Scene, SceneDirector};
pub use highscores::{HighScoreStore, MemoryStore};
pub use settings::Settings;

/// Game tuning constants, all expressed per simulation tick
pub mod consts {
    /// Duration of one tick in milliseconds (60 updates per second)
    pub const TICK_MS: f32 = 16.67;

    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity applied when landing on a platform (the only source of upward motion)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Horizontal acceleration while a direction is held
    pub const MOVE_ACCEL: f32 = 0.5;
    /// Horizontal speed cap
    pub const MAX_VX: f32 = 8.0;
    /// Horizontal decay factor with no input
    pub const FRICTION: f32 = 0.9;
    /// Horizontal wrap margin (half the player sprite width)
    pub const WRAP_MARGIN: f32 = 25.0;

    /// Sprite extents (width, height); every sprite is centred on its position
    pub const PLAYER_SIZE: (f32, f32) = (50.0, 50.0);
    pub const PLATFORM_SIZE: (f32, f32) = (80.0, 15.0);
    pub const POWER_UP_SIZE: (f32, f32) = (40.0, 40.0);
    pub const UFO_SIZE: (f32, f32) = (60.0, 40.0);
    pub const ALIEN_SIZE: (f32, f32) = (40.0, 50.0);

    /// Moving platform speed and its bounce margin from each edge
    pub const PLATFORM_SPEED: f32 = 2.0;
    pub const PLATFORM_BOUNCE_MARGIN: f32 = 40.0;
    /// Ufo drift speed and the x past which it leaves the column
    pub const UFO_SPEED: f32 = 3.0;
    pub const UFO_EXIT_X: f32 = -50.0;

    /// Broken platform fade before it is removed
    pub const BREAK_FADE_MS: u32 = 500;

    /// Vertical distance between generated platforms
    pub const ROW_STRIDE: f32 = 120.0;
    /// Platforms in a fresh column, seed platform included
    pub const INITIAL_ROWS: u32 = 20;
    /// Rows at the bottom of a run that never carry hazards
    pub const SAFE_ROWS: u32 = 3;
    /// Platforms added whenever the frontier gets close
    pub const BATCH_ROWS: u32 = 5;
    /// Generate more once the frontier is closer than this above the camera
    pub const LOOKAHEAD: f32 = 1000.0;
    /// Entities further than this below the viewport are reclaimed
    pub const RECLAIM_MARGIN: f32 = 200.0;
    /// Hazards sit this far above their platform
    pub const HAZARD_OFFSET: f32 = 60.0;
    /// Platform x is drawn from [PLATFORM_MIN_X, width - PLATFORM_RIGHT_INSET]
    pub const PLATFORM_MIN_X: f32 = 40.0;
    pub const PLATFORM_RIGHT_INSET: f32 = 120.0;

    /// Camera keeps the player at least this far below its top edge
    pub const CAMERA_LEAD: f32 = 200.0;
    /// World units per score point
    pub const SCORE_DIVISOR: f32 = 10.0;

    /// Hazard odds while filling a fresh column
    pub const INITIAL_HAZARD_CHANCE: f32 = 0.15;
    /// Hazard odds for incrementally generated rows
    pub const HAZARD_CHANCE: f32 = 0.2;
}

/// Number of whole ticks needed to cover `ms` milliseconds
#[inline]
pub fn ticks_for_ms(ms: u32) -> u64 {
    (ms as f32 / consts::TICK_MS).ceil() as u64
}
