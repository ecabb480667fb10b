//! Procedural odds
//!
//! Pure draws over a uniform generator. The thresholds are part of the game's
//! feel, so they are compared exactly as listed here.

use rand::Rng;

use super::state::{EnemyKind, PlatformKind};

/// Invincibility durations a power-up can carry (ms)
pub const POWER_UP_DURATIONS: [u32; 3] = [2000, 4000, 6000];

/// What appears above a platform, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Enemy(EnemyKind),
    PowerUp { duration_ms: u32 },
}

/// Normal 70%, moving 20%, broken 10%
pub fn choose_platform_kind(rng: &mut impl Rng) -> PlatformKind {
    platform_kind_for(rng.random::<f32>())
}

fn platform_kind_for(roll: f32) -> PlatformKind {
    if roll < 0.7 {
        PlatformKind::Normal
    } else if roll < 0.9 {
        PlatformKind::Moving
    } else {
        PlatformKind::Broken
    }
}

/// Starting direction of a moving platform
pub fn choose_direction(rng: &mut impl Rng) -> i8 {
    if rng.random::<f32>() < 0.5 { -1 } else { 1 }
}

/// Ufo 60%, alien 40%
pub fn choose_enemy_kind(rng: &mut impl Rng) -> EnemyKind {
    if rng.random::<f32>() < 0.6 {
        EnemyKind::Ufo
    } else {
        EnemyKind::Alien
    }
}

pub fn choose_power_up_duration(rng: &mut impl Rng) -> u32 {
    POWER_UP_DURATIONS[rng.random_range(0..POWER_UP_DURATIONS.len())]
}

/// With probability `chance`, an enemy (70%) or a power-up (30%)
pub fn roll_hazard(rng: &mut impl Rng, chance: f32) -> Option<Hazard> {
    if rng.random::<f32>() >= chance {
        return None;
    }
    let hazard = if rng.random::<f32>() < 0.7 {
        Hazard::Enemy(choose_enemy_kind(rng))
    } else {
        Hazard::PowerUp {
            duration_ms: choose_power_up_duration(rng),
        }
    };
    Some(hazard)
}

/// Integer x in [min, max], both ends inclusive
pub fn choose_platform_x(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let (min, max) = (min as i32, max as i32);
    if max <= min {
        return min as f32;
    }
    rng.random_range(min..=max) as f32
}
