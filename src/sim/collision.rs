//! Collision detection and response
//!
//! Everything is an axis-aligned box centred on the entity position. Overlap
//! is strict: boxes that merely touch do not collide. Resolution runs in a
//! fixed order, platforms then enemies then power-ups.

use glam::Vec2;

use super::presenter::{Presenter, Sprite};
use super::registry::EntityId;
use super::state::{GameEvent, GameState, PlatformKind, PlatformState};
use crate::consts::*;
use crate::ticks_for_ms;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` (width, height) centred on `pos`
    pub fn centered(pos: Vec2, size: (f32, f32)) -> Self {
        let half = Vec2::new(size.0, size.1) / 2.0;
        Self {
            min: pos - half,
            max: pos + half,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// What collision resolution did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Platforms bounced off
    pub landed: Vec<EntityId>,
    /// An enemy ended the run
    pub killed: bool,
    pub collected: Vec<EntityId>,
}

/// Resolve all overlaps for the current positions
pub fn resolve_collisions(state: &mut GameState, presenter: &mut dyn Presenter) -> CollisionOutcome {
    let mut outcome = CollisionOutcome {
        landed: resolve_platforms(state, presenter),
        ..Default::default()
    };

    if hits_enemy(state) {
        outcome.killed = true;
        state.finish();
        return outcome;
    }

    outcome.collected = resolve_power_ups(state, presenter);
    outcome
}

/// Bounce off platforms when falling onto them from above
fn resolve_platforms(state: &mut GameState, presenter: &mut dyn Presenter) -> Vec<EntityId> {
    // Ascending players pass through platforms from below
    if state.player.vel.y <= 0.0 {
        return Vec::new();
    }

    let player_box = state.player.aabb();
    let player_y = state.player.pos.y;
    let remove_at_tick = state.time_ticks + ticks_for_ms(BREAK_FADE_MS);
    let mut landed = Vec::new();

    for (id, platform) in state.registry.platforms_mut().iter_mut() {
        if platform.is_breaking() {
            continue;
        }
        if !platform.aabb().overlaps(&player_box) || player_y >= platform.pos.y {
            continue;
        }

        landed.push(id);
        if platform.kind == PlatformKind::Broken {
            platform.state = PlatformState::Breaking { remove_at_tick };
            presenter.fade_out(platform.handle, BREAK_FADE_MS);
        }
    }

    if !landed.is_empty() {
        state.player.vel.y = JUMP_IMPULSE;
    }
    for &id in &landed {
        let broke = state
            .registry
            .platforms()
            .get(id)
            .is_some_and(|p| p.is_breaking());
        if broke {
            state.push_event(GameEvent::PlatformBroken(id));
        }
    }
    landed
}

/// Any enemy contact is fatal unless the shield is up
fn hits_enemy(state: &GameState) -> bool {
    if state.player.is_invincible() {
        return false;
    }
    let player_box = state.player.aabb();
    state
        .registry
        .enemies()
        .iter()
        .any(|(_, e)| e.aabb().overlaps(&player_box))
}

/// Collect every touched power-up, whatever the vertical direction
fn resolve_power_ups(state: &mut GameState, presenter: &mut dyn Presenter) -> Vec<EntityId> {
    let player_box = state.player.aabb();
    let touched: Vec<(EntityId, u32)> = state
        .registry
        .power_ups()
        .iter()
        .filter(|(_, p)| p.aabb().overlaps(&player_box))
        .map(|(id, p)| (id, p.duration_ms))
        .collect();

    let was_invincible = state.player.is_invincible();
    for &(id, duration_ms) in &touched {
        state.player.shield.grant(duration_ms);
        state.registry.remove_power_up(presenter, id);
        state.push_event(GameEvent::PowerUpCollected { duration_ms });
    }
    if !was_invincible && state.player.is_invincible() {
        presenter.set_sprite(state.player.handle, Sprite::PlayerGolden);
    }

    touched.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::presenter::RecordingPresenter;
    use crate::sim::state::{EnemyKind, RunPhase};

    fn empty_state(presenter: &mut RecordingPresenter) -> GameState {
        GameState::with_empty_column(1024.0, 768.0, 1, 0, presenter).unwrap()
    }

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::centered(Vec2::ZERO, (10.0, 10.0));
        let touching = Aabb::centered(Vec2::new(10.0, 0.0), (10.0, 10.0));
        let inside = Aabb::centered(Vec2::new(9.9, 9.9), (10.0, 10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_landing_on_normal_platform() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        let id = state.registry.add_platform(
            &mut presenter,
            PlatformKind::Normal,
            Vec2::new(500.0, 400.0),
            0,
        );
        state.player.pos = Vec2::new(500.0, 370.0);
        state.player.vel.y = 4.0;

        let outcome = resolve_collisions(&mut state, &mut presenter);
        assert_eq!(outcome.landed, vec![id]);
        assert_eq!(state.player.vel.y, -15.0);
        assert!(state.registry.platforms().contains(id));
    }

    #[test]
    fn test_rising_player_passes_through() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        state.registry.add_platform(
            &mut presenter,
            PlatformKind::Normal,
            Vec2::new(500.0, 400.0),
            0,
        );
        state.player.pos = Vec2::new(500.0, 370.0);
        state.player.vel.y = -3.0;

        let outcome = resolve_collisions(&mut state, &mut presenter);
        assert!(outcome.landed.is_empty());
        assert_eq!(state.player.vel.y, -3.0);
    }

    #[test]
    fn test_overlap_from_below_is_ignored() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        state.registry.add_platform(
            &mut presenter,
            PlatformKind::Normal,
            Vec2::new(500.0, 400.0),
            0,
        );
        // Player centre level with or below the platform centre
        state.player.pos = Vec2::new(500.0, 400.0);
        state.player.vel.y = 2.0;
        assert!(resolve_collisions(&mut state, &mut presenter).landed.is_empty());
        assert_eq!(state.player.vel.y, 2.0);
    }

    #[test]
    fn test_broken_platform_breaks_once() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        let id = state.registry.add_platform(
            &mut presenter,
            PlatformKind::Broken,
            Vec2::new(500.0, 400.0),
            0,
        );
        state.player.pos = Vec2::new(500.0, 370.0);
        state.player.vel.y = 4.0;

        resolve_collisions(&mut state, &mut presenter);
        let platform = state.registry.platforms().get(id).unwrap();
        assert!(platform.is_breaking());

        // Still overlapping and falling: the breaking platform is ignored
        state.player.vel.y = 4.0;
        let again = resolve_collisions(&mut state, &mut presenter);
        assert!(again.landed.is_empty());
        assert_eq!(state.player.vel.y, 4.0);

        let broken_events = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PlatformBroken(_)))
            .count();
        assert_eq!(broken_events, 1);
    }

    #[test]
    fn test_enemy_contact_ends_run() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        state
            .registry
            .add_enemy(&mut presenter, EnemyKind::Alien, state.player.pos);

        let outcome = resolve_collisions(&mut state, &mut presenter);
        assert!(outcome.killed);
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_shield_ignores_enemies() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        state
            .registry
            .add_enemy(&mut presenter, EnemyKind::Ufo, state.player.pos);
        state.player.shield.grant(4000);

        let outcome = resolve_collisions(&mut state, &mut presenter);
        assert!(!outcome.killed);
        assert_eq!(state.phase, RunPhase::Playing);
    }

    #[test]
    fn test_power_up_pickup_while_rising() {
        let mut presenter = RecordingPresenter::new();
        let mut state = empty_state(&mut presenter);
        let id = state
            .registry
            .add_power_up(&mut presenter, state.player.pos + Vec2::new(10.0, -10.0), 6000);
        state.player.vel.y = -10.0;

        let outcome = resolve_collisions(&mut state, &mut presenter);
        assert_eq!(outcome.collected, vec![id]);
        assert!(state.registry.power_ups().is_empty());
        assert_eq!(state.player.shield.remaining_ms(), 6000.0);
        assert!(presenter.calls.contains(&crate::sim::presenter::PresenterCall::SetSprite {
            handle: state.player.handle,
            sprite: Sprite::PlayerGolden,
        }));
    }
}
