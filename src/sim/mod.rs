//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, fixed per-tick constants
//! - Randomness only through the run's own RNG
//! - No rendering: visible effects go through `Presenter`

pub mod collision;
pub mod generate;
pub mod physics;
pub mod policy;
pub mod presenter;
pub mod registry;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionOutcome, resolve_collisions};
pub use physics::Steer;
pub use policy::Hazard;
pub use presenter::{
    Handle, HeadlessPresenter, Presenter, PresenterCall, RecordingPresenter, Sprite,
};
pub use registry::{EntityId, Registry, Store};
pub use state::{
    Enemy, EnemyKind, GameEvent, GameOverReport, GameState, Platform, PlatformKind,
    PlatformState, Player, PowerUp, PowerUpKind, RunPhase, Shield,
};
pub use tick::{TickInput, score_for_offset, tick};
