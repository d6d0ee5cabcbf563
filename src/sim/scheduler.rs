//! Spawn cadence and formations
//!
//! The scheduler runs on its own fixed interval, independent of the frame
//! loop. Every tick it may launch a formation depending on the current
//! pattern's odds and cooldown. An emergency spawn bypasses both whenever the
//! playfield is empty or nothing has launched for too long.

use std::time::Duration;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameSession;
use crate::consts::*;

/// Scheduler ticks between pattern re-rolls
pub const PATTERN_REROLL_TICKS: u32 = 50;
/// Seconds without a launch before an emergency spawn
pub const EMERGENCY_SPAWN_SECS: f64 = 3.0;

/// Formation launched in one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpawnPattern {
    #[default]
    Single,
    /// Tight group with jittered velocities
    Cluster,
    /// Evenly spaced row sharing one velocity
    Line,
    /// Fan of projectiles spreading outward
    Arc,
}

impl SpawnPattern {
    pub const ALL: [SpawnPattern; 4] = [
        SpawnPattern::Single,
        SpawnPattern::Cluster,
        SpawnPattern::Line,
        SpawnPattern::Arc,
    ];

    /// Chance per scheduler tick that this pattern fires
    pub fn trigger_chance(&self) -> f64 {
        match self {
            SpawnPattern::Single => 0.25,
            SpawnPattern::Cluster => 0.12,
            SpawnPattern::Line => 0.08,
            SpawnPattern::Arc => 0.08,
        }
    }

    /// Ticks to wait after this pattern fires
    pub fn cooldown_ticks(&self) -> u32 {
        match self {
            SpawnPattern::Single => 3,
            SpawnPattern::Cluster => 12,
            SpawnPattern::Line => 18,
            SpawnPattern::Arc => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnPattern::Single => "single",
            SpawnPattern::Cluster => "cluster",
            SpawnPattern::Line => "line",
            SpawnPattern::Arc => "arc",
        }
    }
}

/// Spawn cadence state, owned by whoever drives the spawn loop
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub pattern: SpawnPattern,
    /// Scheduler cadence; used to convert tick counts into seconds
    pub interval: Duration,
    ticks_in_pattern: u32,
    cooldown: u32,
    ticks_since_spawn: u32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(SPAWN_INTERVAL_MS))
    }
}

impl SpawnScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            pattern: SpawnPattern::Single,
            interval,
            ticks_in_pattern: 0,
            cooldown: 0,
            ticks_since_spawn: 0,
        }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Time since the last successful batch
    pub fn since_last_spawn(&self) -> Duration {
        self.interval * self.ticks_since_spawn
    }

    /// Whether the next evaluation must spawn regardless of odds
    pub fn emergency(&self, session: &GameSession) -> bool {
        session.active_count() == 0
            || self.since_last_spawn().as_secs_f64() >= EMERGENCY_SPAWN_SECS
    }

    /// One scheduler evaluation; returns the number of projectiles launched
    pub fn tick(&mut self, session: &mut GameSession) -> usize {
        if !session.is_playing() {
            return 0;
        }

        self.ticks_in_pattern += 1;
        if self.ticks_in_pattern >= PATTERN_REROLL_TICKS {
            self.ticks_in_pattern = 0;
            let index = session.rng_mut().random_range(0..SpawnPattern::ALL.len());
            self.pattern = SpawnPattern::ALL[index];
            log::debug!("Spawn pattern now {}", self.pattern.as_str());
        }
        self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(1);

        let emergency = self.emergency(session);
        if !emergency {
            if self.cooldown > 0 {
                self.cooldown -= 1;
                return 0;
            }
            let chance = self.pattern.trigger_chance();
            if !session.rng_mut().random_bool(chance) {
                return 0;
            }
        }

        let mut spawned = spawn_formation(self.pattern, session);
        if spawned == 0 && emergency {
            // A formation can fail to fit; a lone spawn still might
            spawned = usize::from(session.spawn_default().is_some());
        }

        if spawned > 0 {
            if emergency {
                log::debug!("Emergency spawn: {} launched", spawned);
            }
            self.cooldown = self.pattern.cooldown_ticks();
            self.ticks_since_spawn = 0;
        }
        spawned
    }
}

/// Launch one batch of `pattern`; members that don't fit in the pool are dropped
pub fn spawn_formation(pattern: SpawnPattern, session: &mut GameSession) -> usize {
    let launches = match pattern {
        SpawnPattern::Single => return usize::from(session.spawn_default().is_some()),
        SpawnPattern::Cluster => cluster_launches(session),
        SpawnPattern::Line => line_launches(session),
        SpawnPattern::Arc => arc_launches(session),
    };

    launches
        .into_iter()
        .filter_map(|(position, velocity)| session.spawn_at(position, velocity))
        .count()
}

/// 3-4 projectiles bunched around one point
fn cluster_launches(session: &mut GameSession) -> Vec<(DVec2, DVec2)> {
    let tuning = session.tuning.clone();
    let y = tuning.launch_y();
    let rng = session.rng_mut();
    let count = rng.random_range(3..=4);
    let center_x = rng.random_range(FRUIT_SIZE * 2.0..=PLAYFIELD_WIDTH - FRUIT_SIZE * 2.0);
    let base = tuning.draw_velocity(rng);

    (0..count)
        .map(|_| {
            let x = center_x + rng.random_range(-40.0..=40.0);
            let jitter = DVec2::new(rng.random_range(-0.5..=0.5), rng.random_range(-0.5..=0.5));
            (DVec2::new(x, y), base + jitter * tuning.speed_multiplier)
        })
        .collect()
}

/// 4-5 projectiles spread across the width, moving together
fn line_launches(session: &mut GameSession) -> Vec<(DVec2, DVec2)> {
    let tuning = session.tuning.clone();
    let y = tuning.launch_y();
    let rng = session.rng_mut();
    let count: usize = rng.random_range(4..=5);
    let (vy_min, vy_max) = tuning.vy_band();
    let velocity = DVec2::new(0.0, (vy_min + vy_max) / 2.0) * tuning.speed_multiplier;
    let spacing = (PLAYFIELD_WIDTH - FRUIT_SIZE * 2.0) / (count - 1) as f64;

    (0..count)
        .map(|i| (DVec2::new(FRUIT_SIZE + spacing * i as f64, y), velocity))
        .collect()
}

/// 5 projectiles from a common point, fanned horizontally
fn arc_launches(session: &mut GameSession) -> Vec<(DVec2, DVec2)> {
    let tuning = session.tuning.clone();
    let y = tuning.launch_y();
    let rng = session.rng_mut();
    let center_x = rng.random_range(PLAYFIELD_WIDTH * 0.3..=PLAYFIELD_WIDTH * 0.7);
    let (vy_min, vy_max) = tuning.vy_band();
    let count = 5;

    (0..count)
        .map(|i| {
            // t runs -1..1 across the fan; the middle member takes vy_min, the edges sit mid-band
            let t = i as f64 / (count - 1) as f64 * 2.0 - 1.0;
            let vy = vy_max + (vy_min - vy_max) * (1.0 - t.abs() * 0.5);
            let velocity = DVec2::new(t * 2.5, vy) * tuning.speed_multiplier;
            (DVec2::new(center_x + t * FRUIT_SIZE, y), velocity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_forces_spawn() {
        let mut session = GameSession::new(42);
        let mut scheduler = SpawnScheduler::default();
        for pattern in SpawnPattern::ALL {
            session.pool.clear();
            scheduler.pattern = pattern;
            assert_eq!(session.active_count(), 0);
            scheduler.tick(&mut session);
            assert!(session.active_count() > 0, "{} did not spawn", pattern.as_str());
        }
    }

    #[test]
    fn test_emergency_after_quiet_period() {
        let mut session = GameSession::new(42);
        session.spawn_default();
        let mut scheduler = SpawnScheduler::default();
        let quiet_ticks = (EMERGENCY_SPAWN_SECS * 1000.0 / SPAWN_INTERVAL_MS as f64) as u32;
        scheduler.ticks_since_spawn = quiet_ticks;
        scheduler.cooldown = 1000;
        assert!(scheduler.emergency(&session));
        assert!(scheduler.tick(&mut session) > 0);
    }

    #[test]
    fn test_cooldown_blocks_normal_spawns() {
        let mut session = GameSession::new(42);
        session.spawn_default();
        let mut scheduler = SpawnScheduler::default();
        scheduler.cooldown = 5;
        for _ in 0..5 {
            assert_eq!(scheduler.tick(&mut session), 0);
        }
        assert_eq!(scheduler.cooldown(), 0);
    }

    #[test]
    fn test_full_pool_drops_silently() {
        let mut session = GameSession::new(42);
        while session.spawn_default().is_some() {}
        let mut scheduler = SpawnScheduler::default();
        for pattern in SpawnPattern::ALL {
            assert_eq!(spawn_formation(pattern, &mut session), 0);
        }
        for _ in 0..100 {
            scheduler.tick(&mut session);
        }
        assert_eq!(session.active_count(), POOL_CAPACITY);
    }

    #[test]
    fn test_no_spawns_outside_playing() {
        let mut session = GameSession::new(42);
        session.health = 0;
        session.check_game_over();
        let mut scheduler = SpawnScheduler::default();
        assert_eq!(scheduler.tick(&mut session), 0);
        assert_eq!(session.active_count(), 0);
    }

    #[test]
    fn test_formation_sizes() {
        let mut session = GameSession::new(3);
        assert_eq!(spawn_formation(SpawnPattern::Arc, &mut session), 5);
        session.pool.clear();
        let line = spawn_formation(SpawnPattern::Line, &mut session);
        assert!((4..=5).contains(&line));
        session.pool.clear();
        let cluster = spawn_formation(SpawnPattern::Cluster, &mut session);
        assert!((3..=4).contains(&cluster));
    }

    #[test]
    fn test_pattern_rerolls() {
        let mut session = GameSession::new(8);
        let mut scheduler = SpawnScheduler::default();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..PATTERN_REROLL_TICKS * 40 {
            scheduler.tick(&mut session);
            seen.insert(scheduler.pattern);
            session.pool.clear();
        }
        assert!(seen.len() > 1);
    }
}
