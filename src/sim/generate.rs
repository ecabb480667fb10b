//! Level generation window
//!
//! The column is generated lazily: a batch of rows is added whenever the
//! highest platform comes within `LOOKAHEAD` of the camera, and anything that
//! scrolls far enough below the viewport is reclaimed.

use glam::Vec2;

use super::policy::{self, Hazard};
use super::presenter::Presenter;
use super::state::{GameState, PlatformKind};
use crate::consts::*;

/// Place one platform (and maybe a hazard above it). `hazard_chance` of
/// `None` keeps the row clear.
fn spawn_row(
    state: &mut GameState,
    presenter: &mut dyn Presenter,
    y: f32,
    hazard_chance: Option<f32>,
) {
    let x = policy::choose_platform_x(
        &mut state.rng,
        PLATFORM_MIN_X,
        state.width - PLATFORM_RIGHT_INSET,
    );
    let kind = policy::choose_platform_kind(&mut state.rng);
    let direction = if kind == PlatformKind::Moving {
        policy::choose_direction(&mut state.rng)
    } else {
        0
    };
    state
        .registry
        .add_platform(presenter, kind, Vec2::new(x, y), direction);

    let Some(chance) = hazard_chance else {
        return;
    };
    let pos = Vec2::new(x, y - HAZARD_OFFSET);
    match policy::roll_hazard(&mut state.rng, chance) {
        Some(Hazard::Enemy(kind)) => {
            state.registry.add_enemy(presenter, kind, pos);
        }
        Some(Hazard::PowerUp { duration_ms }) => {
            state.registry.add_power_up(presenter, pos, duration_ms);
        }
        None => {}
    }
}

/// Seed platform under the player plus the first stretch of column
pub fn fill_initial(state: &mut GameState, presenter: &mut dyn Presenter) {
    let base_y = state.height - 50.0;
    state.registry.add_platform(
        presenter,
        PlatformKind::Normal,
        Vec2::new(state.width / 2.0 - 40.0, base_y),
        0,
    );

    for row in 1..INITIAL_ROWS {
        let y = base_y - row as f32 * ROW_STRIDE;
        let chance = (row > SAFE_ROWS).then_some(INITIAL_HAZARD_CHANCE);
        spawn_row(state, presenter, y, chance);
    }

    log::debug!(
        "Initial column: {} platforms, {} enemies, {} power-ups",
        state.registry.platforms().len(),
        state.registry.enemies().len(),
        state.registry.power_ups().len()
    );
}

/// Add a batch of rows above the frontier when it gets close to the camera.
/// Returns the number of platforms added.
pub fn extend(state: &mut GameState, presenter: &mut dyn Presenter) -> u32 {
    // An emptied column restarts from the bottom of the view
    let frontier = state
        .frontier()
        .unwrap_or(state.camera_offset + state.height + ROW_STRIDE);
    if frontier <= state.camera_offset - LOOKAHEAD {
        return 0;
    }

    for row in 0..BATCH_ROWS {
        let y = frontier - ROW_STRIDE - row as f32 * ROW_STRIDE;
        spawn_row(state, presenter, y, Some(HAZARD_CHANCE));
    }
    log::debug!(
        "Extended column above y={} (camera {})",
        frontier,
        state.camera_offset
    );
    BATCH_ROWS
}

/// Remove everything that scrolled past the reclaim threshold.
/// Returns the number of entities removed.
pub fn reclaim(state: &mut GameState, presenter: &mut dyn Presenter) -> usize {
    let threshold = state.reclaim_threshold();

    let platforms = state.registry.platforms().ids_where(|p| p.pos.y > threshold);
    let enemies = state.registry.enemies().ids_where(|e| e.pos.y > threshold);
    let power_ups = state.registry.power_ups().ids_where(|p| p.pos.y > threshold);

    for &id in &platforms {
        state.registry.remove_platform(presenter, id);
    }
    for &id in &enemies {
        state.registry.remove_enemy(presenter, id);
    }
    for &id in &power_ups {
        state.registry.remove_power_up(presenter, id);
    }

    platforms.len() + enemies.len() + power_ups.len()
}
