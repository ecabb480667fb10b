//! Presentation capability
//!
//! The simulation never draws anything. Every visible side effect (sprite
//! creation, destruction, fades, camera scroll, HUD text) goes through the
//! `Presenter` trait so the core runs headless in tests and native builds.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PresenterError;

/// Opaque renderer-side handle for a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub u64);

/// Visual variant requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    /// Player while the invincibility shield is up
    PlayerGolden,
    Platform,
    PlatformMoving,
    PlatformBroken,
    Ufo,
    Alien,
    PowerUp,
}

impl Sprite {
    /// Texture name the host uses for this sprite
    pub fn texture_key(&self) -> &'static str {
        match self {
            Sprite::Player => "snoo",
            Sprite::PlayerGolden => "snoo-golden",
            Sprite::Platform => "platform",
            Sprite::PlatformMoving => "platform-moving",
            Sprite::PlatformBroken => "platform-broken",
            Sprite::Ufo => "ufo",
            Sprite::Alien => "alien",
            Sprite::PowerUp => "powerup",
        }
    }
}

/// Host presentation layer
pub trait Presenter {
    /// Create a sprite and hand back its handle
    fn spawn(&mut self, sprite: Sprite, pos: Vec2) -> Handle;

    /// Destroy a sprite. Failures are logged by the caller and never retried.
    fn release(&mut self, handle: Handle) -> Result<(), PresenterError>;

    fn move_to(&mut self, _handle: Handle, _pos: Vec2) {}

    fn set_sprite(&mut self, _handle: Handle, _sprite: Sprite) {}

    /// Start a fire-and-forget fade; the simulation removes the entity itself
    fn fade_out(&mut self, _handle: Handle, _duration_ms: u32) {}

    fn camera_moved(&mut self, _offset: f32) {}

    fn show_score(&mut self, _text: &str) {}

    fn show_high_score(&mut self, _text: &str) {}
}

/// Presenter that draws nothing
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    next_handle: u64,
}

impl Presenter for HeadlessPresenter {
    fn spawn(&mut self, _sprite: Sprite, _pos: Vec2) -> Handle {
        self.next_handle += 1;
        Handle(self.next_handle)
    }

    fn release(&mut self, _handle: Handle) -> Result<(), PresenterError> {
        Ok(())
    }
}

/// A single presenter call, as recorded by `RecordingPresenter`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PresenterCall {
    Spawn { handle: Handle, sprite: Sprite, pos: Vec2 },
    Release { handle: Handle },
    Move { handle: Handle, pos: Vec2 },
    SetSprite { handle: Handle, sprite: Sprite },
    FadeOut { handle: Handle, duration_ms: u32 },
    Camera { offset: f32 },
    Score { text: String },
    HighScore { text: String },
}

/// Presenter that keeps a log of every call and tracks live handles
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<PresenterCall>,
    live: HashSet<Handle>,
    next_handle: u64,
    /// Make every release fail (exercises the log-and-ignore path)
    pub reject_releases: bool,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sprites currently alive on the renderer side
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.live.contains(&handle)
    }

    /// Take the recorded calls, leaving the log empty
    pub fn drain(&mut self) -> Vec<PresenterCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn releases_of(&self, handle: Handle) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PresenterCall::Release { handle: h } if *h == handle))
            .count()
    }
}

impl Presenter for RecordingPresenter {
    fn spawn(&mut self, sprite: Sprite, pos: Vec2) -> Handle {
        self.next_handle += 1;
        let handle = Handle(self.next_handle);
        self.live.insert(handle);
        self.calls.push(PresenterCall::Spawn { handle, sprite, pos });
        handle
    }

    fn release(&mut self, handle: Handle) -> Result<(), PresenterError> {
        self.calls.push(PresenterCall::Release { handle });
        if self.reject_releases {
            return Err(PresenterError::Other("release rejected".to_string()));
        }
        if self.live.remove(&handle) {
            Ok(())
        } else {
            Err(PresenterError::UnknownHandle(handle.0))
        }
    }

    fn move_to(&mut self, handle: Handle, pos: Vec2) {
        self.calls.push(PresenterCall::Move { handle, pos });
    }

    fn set_sprite(&mut self, handle: Handle, sprite: Sprite) {
        self.calls.push(PresenterCall::SetSprite { handle, sprite });
    }

    fn fade_out(&mut self, handle: Handle, duration_ms: u32) {
        self.calls.push(PresenterCall::FadeOut { handle, duration_ms });
    }

    fn camera_moved(&mut self, offset: f32) {
        self.calls.push(PresenterCall::Camera { offset });
    }

    fn show_score(&mut self, text: &str) {
        self.calls.push(PresenterCall::Score {
            text: text.to_string(),
        });
    }

    fn show_high_score(&mut self, text: &str) {
        self.calls.push(PresenterCall::HighScore {
            text: text.to_string(),
        });
    }
}

/// Release a handle, logging instead of propagating failures
pub(crate) fn release_quietly(presenter: &mut dyn Presenter, handle: Handle) {
    if let Err(e) = presenter.release(handle) {
        log::warn!("Failed to release sprite {:?}: {}", handle, e);
    }
}
