//! Fruit Slice - a fruit slicing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projectile pool, physics, slice collisions, game state)
//! - `platform`: Background spawn task and power-up feed
//! - `persistence`: Leaderboard load/save
//! - `settings`: Runtime tuning
//! - `audio`: Mapping of core events to sound effects

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, ScoreRecord};
pub use settings::{Difficulty, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (top-left origin, y grows downward)
    pub const PLAYFIELD_WIDTH: f64 = 800.0;
    pub const PLAYFIELD_HEIGHT: f64 = 600.0;

    /// Number of projectile slots in the pool
    pub const POOL_CAPACITY: usize = 20;
    /// Nominal sprite size of a fruit or bomb (pixels)
    pub const FRUIT_SIZE: f64 = 64.0;

    /// Fragments produced by one slice
    pub const FRAGMENT_COUNT: usize = 2;
    /// Fragment lifetime after a slice (frames)
    pub const SLICE_DURATION: u32 = 30;

    /// Health at session start
    pub const STARTING_HEALTH: i32 = 3;
    /// Leaderboard size
    pub const MAX_SCORES: usize = 10;

    /// Gravity added to vy every frame (pixels/frame²)
    pub const GRAVITY: f64 = 0.3;
    /// Fragments fall faster than whole projectiles
    pub const FRAGMENT_GRAVITY: f64 = 0.5;
    /// Fragment launch speed band (pixels/frame)
    pub const FRAGMENT_SPEED_MIN: f64 = 2.0;
    pub const FRAGMENT_SPEED_MAX: f64 = 4.0;

    /// Pointer moves shorter than this are jitter, not slices
    pub const MIN_SLICE_DISTANCE: f64 = 5.0;
    /// Pointer moves longer than this also test the segment from two samples back
    pub const FAST_SWIPE_DISTANCE: f64 = 40.0;
    /// Interpolated points tested along each pointer segment
    pub const SLICE_SAMPLES: usize = 12;
    /// Projectile speed above which the hit radius grows with speed
    pub const FAST_OBJECT_SPEED: f64 = 8.0;
    /// Extra radius fraction per pixel/frame of projectile speed
    pub const SPEED_RADIUS_FACTOR: f64 = 0.03;
    /// How far ahead (in frames) a fast projectile is projected for the hit test
    pub const LOOKAHEAD_FRAMES: f64 = 0.5;

    /// Main loop cadence (~60 Hz)
    pub const FRAME_INTERVAL_MS: u64 = 16;
    /// Spawn task cadence
    pub const SPAWN_INTERVAL_MS: u64 = 100;

    /// Bomb probability for single spawns (1 in 5)
    pub const SINGLE_BOMB_CHANCE: f64 = 0.2;
    /// Bomb probability inside formations (must stay below the single chance)
    pub const FORMATION_BOMB_CHANCE: f64 = 0.08;
    /// Global launch speed scale
    pub const SPEED_MULTIPLIER: f64 = 1.0;

    /// Power-up duration (frames, 10 seconds at 60 Hz)
    pub const POWER_UP_DURATION: u32 = 600;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

/// Unit vector for an angle (radians)
#[inline]
pub fn unit(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-9);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-9);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(DVec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 1.0).abs() < 1e-9);
    }
}
