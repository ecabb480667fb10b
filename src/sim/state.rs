//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`, which is passed through the
//! tick pipeline. Nothing here outlives a run except the high score, which the
//! session reloads from storage when the next run starts.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::generate;
use super::presenter::{Handle, Presenter, Sprite, release_quietly};
use super::registry::{EntityId, Registry};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::validate_viewport;

/// Run lifecycle. A run starts in `Playing`; `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    GameOver,
}

/// Invincibility window. Active always carries a positive remainder.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Shield {
    #[default]
    Inactive,
    Active { remaining_ms: f32 },
}

impl Shield {
    pub fn is_active(&self) -> bool {
        matches!(self, Shield::Active { .. })
    }

    pub fn remaining_ms(&self) -> f32 {
        match self {
            Shield::Inactive => 0.0,
            Shield::Active { remaining_ms } => *remaining_ms,
        }
    }

    /// Replace the current window with a fresh one; 0 closes it
    pub fn grant(&mut self, duration_ms: u32) {
        *self = if duration_ms == 0 {
            Shield::Inactive
        } else {
            Shield::Active {
                remaining_ms: duration_ms as f32,
            }
        };
    }

    /// Count down by `elapsed_ms`; returns true on the tick the window closes
    pub fn tick(&mut self, elapsed_ms: f32) -> bool {
        if let Shield::Active { remaining_ms } = self {
            *remaining_ms -= elapsed_ms;
            if *remaining_ms <= 0.0 {
                *self = Shield::Inactive;
                return true;
            }
        }
        false
    }
}

/// The avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub shield: Shield,
    pub handle: Handle,
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, PLAYER_SIZE)
    }

    pub fn is_invincible(&self) -> bool {
        self.shield.is_active()
    }

    pub fn sprite(&self) -> Sprite {
        if self.is_invincible() {
            Sprite::PlayerGolden
        } else {
            Sprite::Player
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Moving,
    /// Crumbles after one landing
    Broken,
}

impl PlatformKind {
    pub fn sprite(&self) -> Sprite {
        match self {
            PlatformKind::Normal => Sprite::Platform,
            PlatformKind::Moving => Sprite::PlatformMoving,
            PlatformKind::Broken => Sprite::PlatformBroken,
        }
    }
}

/// Platform lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformState {
    Solid,
    /// Landed on and fading out; removed once the tick counter reaches the deadline
    Breaking { remove_at_tick: u64 },
}

#[derive(Debug, Clone)]
pub struct Platform {
    pub pos: Vec2,
    pub kind: PlatformKind,
    /// -1/+1 for moving platforms, 0 otherwise
    pub direction: i8,
    pub state: PlatformState,
    pub handle: Handle,
}

impl Platform {
    pub fn new(kind: PlatformKind, pos: Vec2, direction: i8, handle: Handle) -> Self {
        Self {
            pos,
            kind,
            direction: if kind == PlatformKind::Moving {
                direction.signum()
            } else {
                0
            },
            state: PlatformState::Solid,
            handle,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, PLATFORM_SIZE)
    }

    pub fn is_breaking(&self) -> bool {
        matches!(self.state, PlatformState::Breaking { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Drifts sideways and leaves off the left edge
    Ufo,
    /// Stationary
    Alien,
}

impl EnemyKind {
    pub fn sprite(&self) -> Sprite {
        match self {
            EnemyKind::Ufo => Sprite::Ufo,
            EnemyKind::Alien => Sprite::Alien,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        match self {
            EnemyKind::Ufo => UFO_SIZE,
            EnemyKind::Alien => ALIEN_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub direction: i8,
    pub handle: Handle,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, handle: Handle) -> Self {
        // Ufos only ever drift left
        let direction = match kind {
            EnemyKind::Ufo => -1,
            EnemyKind::Alien => 0,
        };
        Self {
            pos,
            kind,
            direction,
            handle,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, self.kind.size())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Invincibility,
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub duration_ms: u32,
    pub handle: Handle,
}

impl PowerUp {
    pub fn invincibility(pos: Vec2, duration_ms: u32, handle: Handle) -> Self {
        Self {
            pos,
            kind: PowerUpKind::Invincibility,
            duration_ms,
            handle,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, POWER_UP_SIZE)
    }
}

/// Final numbers handed to the game-over scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverReport {
    pub score: u64,
    pub high_score: u64,
    /// This run set the high score
    pub new_high_score: bool,
}

/// Things that happened during a tick that the session cares about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Score passed the stored high score; persist it now
    HighScore(u64),
    PlatformBroken(EntityId),
    PowerUpCollected { duration_ms: u32 },
    ShieldExpired,
    GameOver(GameOverReport),
}

/// Complete state of one run
#[derive(Debug)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Viewport size
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub registry: Registry,
    /// Vertical scroll; only ever decreases
    pub camera_offset: f32,
    pub score: u64,
    pub high_score: u64,
    pub phase: RunPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run: player on the seed platform, 20-row column above it
    pub fn new(
        width: f32,
        height: f32,
        seed: u64,
        high_score: u64,
        presenter: &mut dyn Presenter,
    ) -> Result<Self, ConfigError> {
        let mut state = Self::with_empty_column(width, height, seed, high_score, presenter)?;
        generate::fill_initial(&mut state, presenter);
        log::info!(
            "Run started: seed {}, viewport {}x{}, high score {}",
            seed,
            width,
            height,
            high_score
        );
        Ok(state)
    }

    /// Player and run state only, no platforms. Hosts with custom layouts
    /// (and tests) populate the registry themselves.
    pub fn with_empty_column(
        width: f32,
        height: f32,
        seed: u64,
        high_score: u64,
        presenter: &mut dyn Presenter,
    ) -> Result<Self, ConfigError> {
        validate_viewport(width, height)?;

        let pos = Vec2::new(width / 2.0, height - 100.0);
        let handle = presenter.spawn(Sprite::Player, pos);
        presenter.show_score("Score: 0");
        presenter.show_high_score(&format!("High: {}", high_score));

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            player: Player {
                pos,
                vel: Vec2::new(0.0, JUMP_IMPULSE),
                shield: Shield::Inactive,
                handle,
            },
            registry: Registry::new(),
            camera_offset: 0.0,
            score: 0,
            high_score,
            phase: RunPhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Highest live platform (smallest y)
    pub fn frontier(&self) -> Option<f32> {
        self.registry
            .platforms()
            .iter()
            .map(|(_, p)| p.pos.y)
            .min_by(f32::total_cmp)
    }

    /// Entities below this y are reclaimed
    pub fn reclaim_threshold(&self) -> f32 {
        self.camera_offset + self.height + RECLAIM_MARGIN
    }

    /// Apply a new viewport size mid-run
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        validate_viewport(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the run. Idempotent: only the first call reports.
    pub fn finish(&mut self) -> Option<GameOverReport> {
        if self.is_over() {
            return None;
        }
        self.phase = RunPhase::GameOver;
        self.high_score = self.high_score.max(self.score);
        let report = GameOverReport {
            score: self.score,
            high_score: self.high_score,
            new_high_score: self.score == self.high_score && self.score > 0,
        };
        log::info!(
            "Game over at tick {}: score {}, high score {}",
            self.time_ticks,
            report.score,
            report.high_score
        );
        self.push_event(GameEvent::GameOver(report));
        Some(report)
    }

    /// Release every sprite this run owns
    pub fn teardown(&mut self, presenter: &mut dyn Presenter) {
        self.registry.clear(presenter);
        release_quietly(presenter, self.player.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::presenter::{HeadlessPresenter, RecordingPresenter};

    #[test]
    fn test_shield_invariant() {
        let mut shield = Shield::default();
        assert!(!shield.is_active());
        assert_eq!(shield.remaining_ms(), 0.0);
        assert!(!shield.tick(TICK_MS));

        shield.grant(2000);
        assert!(shield.is_active());
        assert_eq!(shield.remaining_ms(), 2000.0);

        let mut ticks = 0;
        while !shield.tick(TICK_MS) {
            assert!(shield.remaining_ms() > 0.0);
            ticks += 1;
        }
        // 2000 / 16.67 = 119.98, so the 120th countdown closes it
        assert_eq!(ticks + 1, 120);
        assert_eq!(shield, Shield::Inactive);
        assert_eq!(shield.remaining_ms(), 0.0);
    }

    #[test]
    fn test_regrant_replaces_window() {
        let mut shield = Shield::default();
        shield.grant(6000);
        shield.tick(1000.0);
        shield.grant(2000);
        assert_eq!(shield.remaining_ms(), 2000.0);
    }

    #[test]
    fn test_zero_grant_closes_window() {
        let mut shield = Shield::default();
        shield.grant(0);
        assert_eq!(shield, Shield::Inactive);

        shield.grant(4000);
        shield.grant(0);
        assert!(!shield.is_active());
        assert_eq!(shield.remaining_ms(), 0.0);
        assert!(!shield.tick(TICK_MS));
    }

    #[test]
    fn test_new_run_layout() {
        let mut presenter = HeadlessPresenter::default();
        let state = GameState::new(1024.0, 768.0, 42, 17, &mut presenter).unwrap();
        assert_eq!(state.player.pos, Vec2::new(512.0, 668.0));
        assert_eq!(state.player.vel, Vec2::new(0.0, -15.0));
        assert_eq!(state.phase, RunPhase::Playing);
        assert_eq!(state.high_score, 17);
        assert_eq!(state.registry.platforms().len(), 20);
        assert_eq!(state.frontier(), Some(718.0 - 19.0 * 120.0));
    }

    #[test]
    fn test_new_rejects_bad_viewport() {
        let mut presenter = HeadlessPresenter::default();
        assert!(GameState::new(0.0, 768.0, 1, 0, &mut presenter).is_err());
        assert!(GameState::new(1024.0, 0.0, 1, 0, &mut presenter).is_err());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::with_empty_column(1024.0, 768.0, 1, 10, &mut presenter).unwrap();
        state.score = 25;

        let report = state.finish().unwrap();
        assert_eq!(
            report,
            GameOverReport {
                score: 25,
                high_score: 25,
                new_high_score: true
            }
        );
        assert!(state.finish().is_none());
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_finish_keeps_higher_stored_score() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::with_empty_column(1024.0, 768.0, 1, 90, &mut presenter).unwrap();
        state.score = 40;
        let report = state.finish().unwrap();
        assert_eq!(report.high_score, 90);
        assert!(!report.new_high_score);
    }

    #[test]
    fn test_teardown_releases_all_sprites() {
        let mut presenter = RecordingPresenter::new();
        let mut state = GameState::new(1024.0, 768.0, 3, 0, &mut presenter).unwrap();
        assert!(presenter.live_count() > 20);
        state.teardown(&mut presenter);
        assert_eq!(presenter.live_count(), 0);
    }

    #[test]
    fn test_resize_validates() {
        let mut presenter = HeadlessPresenter::default();
        let mut state = GameState::with_empty_column(1024.0, 768.0, 1, 0, &mut presenter).unwrap();
        assert!(state.resize(800.0, 600.0).is_ok());
        assert_eq!(state.reclaim_threshold(), 800.0);
        assert!(state.resize(10.0, 600.0).is_err());
        assert_eq!(state.width, 800.0);
    }
}
