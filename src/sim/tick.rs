//! Fixed timestep simulation tick
//!
//! One call advances a run by one frame:
//! input → motion → collisions → shield countdown → camera/score →
//! broken-platform removal → generation → reclaim.

use super::collision::resolve_collisions;
use super::generate;
use super::physics::{self, Steer};
use super::presenter::{Presenter, Sprite};
use super::state::{GameEvent, GameState, PlatformState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Demo mode: steer toward the nearest platform below
    pub autopilot: bool,
}

impl TickInput {
    /// Left wins when both directions are held
    pub fn steer(&self) -> Steer {
        if self.left {
            Steer::Left
        } else if self.right {
            Steer::Right
        } else {
            Steer::None
        }
    }
}

/// Advance the run by one tick. Does nothing once the run is over.
pub fn tick(state: &mut GameState, input: &TickInput, presenter: &mut dyn Presenter) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer()
    };

    physics::integrate_player(&mut state.player, steer, state.width);
    presenter.move_to(state.player.handle, state.player.pos);
    physics::move_platforms(state, presenter);
    physics::move_enemies(state, presenter);

    resolve_collisions(state, presenter);
    if state.is_over() {
        return;
    }

    if state.player.shield.tick(TICK_MS) {
        presenter.set_sprite(state.player.handle, Sprite::Player);
        state.push_event(GameEvent::ShieldExpired);
    }

    follow_camera(state, presenter);
    remove_broken_platforms(state, presenter);
    generate::extend(state, presenter);
    let reclaimed = generate::reclaim(state, presenter);
    if reclaimed > 0 {
        log::trace!("Reclaimed {} entities at tick {}", reclaimed, state.time_ticks);
    }
}

/// Score for a camera offset: one point per ten units climbed
pub fn score_for_offset(camera_offset: f32) -> u64 {
    (-camera_offset / SCORE_DIVISOR).floor().max(0.0) as u64
}

/// Scroll up with the player and raise score/high score
fn follow_camera(state: &mut GameState, presenter: &mut dyn Presenter) {
    if state.player.pos.y >= state.camera_offset + CAMERA_LEAD {
        return;
    }
    state.camera_offset = state.player.pos.y - CAMERA_LEAD;
    presenter.camera_moved(state.camera_offset);

    let score = score_for_offset(state.camera_offset);
    if score <= state.score {
        return;
    }
    state.score = score;
    presenter.show_score(&format!("Score: {}", score));

    if score > state.high_score {
        state.high_score = score;
        presenter.show_high_score(&format!("High: {}", score));
        state.push_event(GameEvent::HighScore(score));
    }
}

/// Drop broken platforms whose fade has finished
fn remove_broken_platforms(state: &mut GameState, presenter: &mut dyn Presenter) {
    let now = state.time_ticks;
    let done = state.registry.platforms().ids_where(|p| match p.state {
        PlatformState::Breaking { remove_at_tick } => now >= remove_at_tick,
        PlatformState::Solid => false,
    });
    for id in done {
        state.registry.remove_platform(presenter, id);
    }
}

/// Steer toward the closest solid platform below the player
fn autopilot_steer(state: &GameState) -> Steer {
    let player = &state.player;
    let target = state
        .registry
        .platforms()
        .iter()
        .map(|(_, p)| p)
        .filter(|p| !p.is_breaking() && p.pos.y > player.pos.y)
        .filter(|p| p.pos.y <= state.camera_offset + state.height)
        .min_by(|a, b| {
            let da = (a.pos.y - player.pos.y) + (a.pos.x - player.pos.x).abs();
            let db = (b.pos.y - player.pos.y) + (b.pos.x - player.pos.x).abs();
            da.total_cmp(&db)
        });

    match target {
        Some(p) if p.pos.x < player.pos.x - 10.0 => Steer::Left,
        Some(p) if p.pos.x > player.pos.x + 10.0 => Steer::Right,
        _ => Steer::None,
    }
}
