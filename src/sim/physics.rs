//! Per-tick motion: player steering and integration, screen wrap, moving
//! platforms and drifting ufos.

use super::presenter::Presenter;
use super::state::{EnemyKind, GameState, PlatformKind, Player};
use crate::consts::*;

/// Horizontal intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

/// Next horizontal velocity. Held directions accelerate up to the cap;
/// releasing decays geometrically and never snaps to zero.
pub fn steer_vx(vx: f32, steer: Steer) -> f32 {
    match steer {
        Steer::Left => (vx - MOVE_ACCEL).max(-MAX_VX),
        Steer::Right => (vx + MOVE_ACCEL).min(MAX_VX),
        Steer::None => vx * FRICTION,
    }
}

/// Wrap x around the viewport with a half-sprite margin
pub fn wrap_x(x: f32, width: f32) -> f32 {
    if x < -WRAP_MARGIN {
        width + WRAP_MARGIN
    } else if x > width + WRAP_MARGIN {
        -WRAP_MARGIN
    } else {
        x
    }
}

/// Steer, apply gravity, move, wrap
pub fn integrate_player(player: &mut Player, steer: Steer, width: f32) {
    player.vel.x = steer_vx(player.vel.x, steer);
    player.vel.y += GRAVITY;
    player.pos += player.vel;
    player.pos.x = wrap_x(player.pos.x, width);
}

/// Slide moving platforms, bouncing at a fixed margin from each edge
pub fn move_platforms(state: &mut GameState, presenter: &mut dyn Presenter) {
    let width = state.width;
    for (_, platform) in state.registry.platforms_mut().iter_mut() {
        if platform.kind != PlatformKind::Moving || platform.direction == 0 {
            continue;
        }
        platform.pos.x += platform.direction as f32 * PLATFORM_SPEED;
        if platform.pos.x <= PLATFORM_BOUNCE_MARGIN
            || platform.pos.x >= width - PLATFORM_BOUNCE_MARGIN
        {
            platform.direction = -platform.direction;
        }
        presenter.move_to(platform.handle, platform.pos);
    }
}

/// Drift ufos and drop the ones that left the screen; returns how many left
pub fn move_enemies(state: &mut GameState, presenter: &mut dyn Presenter) -> usize {
    for (_, enemy) in state.registry.enemies_mut().iter_mut() {
        if enemy.kind != EnemyKind::Ufo || enemy.direction == 0 {
            continue;
        }
        enemy.pos.x += enemy.direction as f32 * UFO_SPEED;
        presenter.move_to(enemy.handle, enemy.pos);
    }

    let gone = state
        .registry
        .enemies()
        .ids_where(|e| e.kind == EnemyKind::Ufo && e.pos.x < UFO_EXIT_X);
    for &id in &gone {
        state.registry.remove_enemy(presenter, id);
    }
    gone.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::presenter::{Handle, HeadlessPresenter};
    use crate::sim::state::Shield;
    use glam::Vec2;
    use proptest::prelude::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            shield: Shield::Inactive,
            handle: Handle(0),
        }
    }

    #[test]
    fn test_acceleration_clamps() {
        let mut vx = 0.0;
        for _ in 0..40 {
            vx = steer_vx(vx, Steer::Right);
        }
        assert_eq!(vx, 8.0);
        for _ in 0..80 {
            vx = steer_vx(vx, Steer::Left);
        }
        assert_eq!(vx, -8.0);
    }

    #[test]
    fn test_friction_decays_without_snapping() {
        let mut vx = 8.0;
        for _ in 0..100 {
            let next = steer_vx(vx, Steer::None);
            assert!((next - vx * 0.9).abs() < 1e-6);
            vx = next;
        }
        assert!(vx > 0.0 && vx < 1e-3);
    }

    #[test]
    fn test_wrap_edges() {
        assert_eq!(wrap_x(-26.0, 1024.0), 1049.0);
        assert_eq!(wrap_x(-25.0, 1024.0), -25.0);
        assert_eq!(wrap_x(1050.0, 1024.0), -25.0);
        assert_eq!(wrap_x(1049.0, 1024.0), 1049.0);
    }

    #[test]
    fn test_wrap_applies_after_integration() {
        let mut player = player_at(-24.0, 300.0);
        player.vel.x = -1.5;
        // -1.5 - 0.5 = -2.0 → x = -26 → wraps this tick
        integrate_player(&mut player, Steer::Left, 1024.0);
        assert_eq!(player.pos.x, 1049.0);

        let mut player = player_at(1048.0, 300.0);
        player.vel.x = 1.5;
        integrate_player(&mut player, Steer::Right, 1024.0);
        assert_eq!(player.pos.x, -25.0);
    }

    #[test]
    fn test_launch_scenario_constants() {
        let mut player = player_at(512.0, 668.0);
        player.vel.y = -15.0;
        integrate_player(&mut player, Steer::None, 1024.0);
        assert_eq!(player.vel.y, -14.5);
        assert!((player.pos.y - 653.5).abs() < 1e-4);

        for _ in 1..30 {
            integrate_player(&mut player, Steer::None, 1024.0);
        }
        assert_eq!(player.vel.y, 0.0);
        integrate_player(&mut player, Steer::None, 1024.0);
        assert!(player.vel.y > 0.0);
    }

    #[test]
    fn test_moving_platform_bounces_at_margin() {
        let mut presenter = HeadlessPresenter::default();
        let mut state =
            GameState::with_empty_column(1024.0, 768.0, 1, 0, &mut presenter).unwrap();
        let id = state.registry.add_platform(
            &mut presenter,
            PlatformKind::Moving,
            Vec2::new(44.0, 300.0),
            -1,
        );
        move_platforms(&mut state, &mut presenter);
        let p = state.registry.platforms().get(id).unwrap();
        assert_eq!(p.pos.x, 42.0);
        assert_eq!(p.direction, -1);

        move_platforms(&mut state, &mut presenter);
        let p = state.registry.platforms().get(id).unwrap();
        assert_eq!(p.pos.x, 40.0);
        assert_eq!(p.direction, 1);

        move_platforms(&mut state, &mut presenter);
        assert_eq!(state.registry.platforms().get(id).unwrap().pos.x, 42.0);
    }

    #[test]
    fn test_ufo_drifts_left_and_leaves() {
        let mut presenter = HeadlessPresenter::default();
        let mut state =
            GameState::with_empty_column(1024.0, 768.0, 1, 0, &mut presenter).unwrap();
        let ufo = state
            .registry
            .add_enemy(&mut presenter, EnemyKind::Ufo, Vec2::new(-46.0, 300.0));
        let alien = state
            .registry
            .add_enemy(&mut presenter, EnemyKind::Alien, Vec2::new(-100.0, 300.0));

        assert_eq!(move_enemies(&mut state, &mut presenter), 0);
        assert_eq!(state.registry.enemies().get(ufo).unwrap().pos.x, -49.0);

        assert_eq!(move_enemies(&mut state, &mut presenter), 1);
        assert!(!state.registry.enemies().contains(ufo));
        // Aliens never move and are not subject to the side exit
        assert_eq!(state.registry.enemies().get(alien).unwrap().pos.x, -100.0);
    }

    proptest! {
        #[test]
        fn prop_vx_stays_clamped(start in -8.0f32..=8.0, steps in prop::collection::vec(0u8..3, 0..200)) {
            let mut vx = start;
            for s in steps {
                let steer = match s {
                    0 => Steer::None,
                    1 => Steer::Left,
                    _ => Steer::Right,
                };
                vx = steer_vx(vx, steer);
                prop_assert!((-8.0..=8.0).contains(&vx));
            }
        }

        #[test]
        fn prop_wrap_keeps_x_in_band(x in -500.0f32..1500.0) {
            let wrapped = wrap_x(x, 1024.0);
            prop_assert!((-25.0..=1049.0).contains(&wrapped));
        }
    }
}
