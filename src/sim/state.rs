//! Game session state and core simulation types
//!
//! Everything the main loop and the spawn task share lives in [`GameSession`].

use std::time::{Duration, Instant};

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{ProjectilePool, SpawnTuning};
use crate::consts::*;
use crate::highscores::{Leaderboard, unix_timestamp};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Health ran out
    GameOver,
    /// Viewing the leaderboard from the game over screen
    Leaderboard,
}

/// What was launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Apple,
    Banana,
    Orange,
    Bomb,
}

impl ProjectileKind {
    /// Kinds that score when sliced
    pub const FRUITS: [ProjectileKind; 3] = [
        ProjectileKind::Apple,
        ProjectileKind::Banana,
        ProjectileKind::Orange,
    ];

    pub fn is_bomb(&self) -> bool {
        *self == ProjectileKind::Bomb
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Apple => "Apple",
            ProjectileKind::Banana => "Banana",
            ProjectileKind::Orange => "Orange",
            ProjectileKind::Bomb => "Bomb",
        }
    }
}

/// One half of a sliced projectile
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub position: DVec2,
    pub velocity: DVec2,
    pub rotation: f64,
    pub rotation_speed: f64,
    /// Frames left before the fragment disappears
    pub time_remaining: u32,
}

impl Fragment {
    pub fn is_live(&self) -> bool {
        self.time_remaining > 0
    }
}

/// A pool slot
///
/// When `active` is false every other field is stale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub position: DVec2,
    pub velocity: DVec2,
    pub kind: ProjectileKind,
    /// Radians
    pub rotation: f64,
    /// Radians per frame
    pub rotation_speed: f64,
    pub active: bool,
    /// Set once; a sliced projectile only animates its fragments
    pub sliced: bool,
    pub fragments: [Fragment; FRAGMENT_COUNT],
}

impl Projectile {
    /// Can this projectile still be cut?
    pub fn is_sliceable(&self) -> bool {
        self.active && !self.sliced
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn fragments_expired(&self) -> bool {
        self.fragments.iter().all(|f| !f.is_live())
    }

    /// Return the slot to the pool
    pub fn retire(&mut self) {
        self.active = false;
        self.sliced = false;
        self.fragments = [Fragment::default(); FRAGMENT_COUNT];
    }
}

/// Power-up tokens delivered by the power-up feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUp {
    /// Half-speed integration
    SlowMotion,
    /// Fruit worth two points
    DoublePoints,
}

/// Remaining frames of each active power-up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow_motion_frames: u32,
    pub double_points_frames: u32,
}

impl ActiveEffects {
    /// Start (or refresh) a power-up
    pub fn apply(&mut self, power_up: PowerUp) {
        match power_up {
            PowerUp::SlowMotion => self.slow_motion_frames = POWER_UP_DURATION,
            PowerUp::DoublePoints => self.double_points_frames = POWER_UP_DURATION,
        }
    }

    /// Count down one frame
    pub fn tick(&mut self) {
        self.slow_motion_frames = self.slow_motion_frames.saturating_sub(1);
        self.double_points_frames = self.double_points_frames.saturating_sub(1);
    }

    /// Integration step for the current frame
    pub fn time_scale(&self) -> f64 {
        if self.slow_motion_frames > 0 { 0.5 } else { 1.0 }
    }

    pub fn points_per_fruit(&self) -> i64 {
        if self.double_points_frames > 0 { 2 } else { 1 }
    }
}

/// Discrete events for the audio, persistence and presentation sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FruitSliced { slot: usize, kind: ProjectileKind },
    BombSliced { slot: usize },
    /// Emitted exactly once per session, on the Playing → GameOver transition
    GameOver { score: i64, timestamp: u64 },
    PowerUpActivated(PowerUp),
}

/// Pointer history used by the slice resolver
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Most recent sample
    pub last: Option<DVec2>,
    /// The sample before `last`
    pub before: Option<DVec2>,
    pub down: bool,
    /// Whether the last motion was long enough to draw a blade trail
    pub trail_visible: bool,
}

/// One play session: pool, counters, phase and leaderboard
#[derive(Debug, Clone)]
pub struct GameSession {
    pub pool: ProjectilePool,
    pub score: i64,
    pub health: i32,
    pub phase: GamePhase,
    pub effects: ActiveEffects,
    pub tuning: SpawnTuning,
    pub leaderboard: Leaderboard,
    pub pointer: PointerState,
    /// Frames simulated while Playing
    pub frame: u64,
    /// Set by Escape; the outer loop decides what to do with it
    pub quit_requested: bool,
    events: Vec<GameEvent>,
    score_recorded: bool,
    started_at: Instant,
    ended_at: Option<Instant>,
    rng: Pcg32,
}

impl GameSession {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, SpawnTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: SpawnTuning) -> Self {
        Self {
            pool: ProjectilePool::new(POOL_CAPACITY),
            score: 0,
            health: STARTING_HEALTH,
            phase: GamePhase::Playing,
            effects: ActiveEffects::default(),
            tuning,
            leaderboard: Leaderboard::new(),
            pointer: PointerState::default(),
            frame: 0,
            quit_requested: false,
            events: Vec::new(),
            score_recorded: false,
            started_at: Instant::now(),
            ended_at: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Attach a previously persisted leaderboard
    pub fn with_leaderboard(mut self, leaderboard: Leaderboard) -> Self {
        self.leaderboard = leaderboard;
        self
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Wall-clock time since the session (re)started, frozen at game over
    pub fn elapsed_time(&self) -> Duration {
        let end = self.ended_at.unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.started_at)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn one random projectile if a slot is free
    pub fn spawn_default(&mut self) -> Option<usize> {
        let slot = self.pool.find_free_slot()?;
        self.pool
            .spawn_default(slot, &mut self.rng, &self.tuning)
            .then_some(slot)
    }

    /// Spawn one formation member if a slot is free
    pub fn spawn_at(&mut self, position: DVec2, velocity: DVec2) -> Option<usize> {
        let slot = self.pool.find_free_slot()?;
        let bomb_chance = self.tuning.formation_bomb_chance;
        self.pool
            .spawn_at(slot, position, velocity, &mut self.rng, bomb_chance)
            .then_some(slot)
    }

    /// Take one point of damage, clamped at zero
    pub fn lose_health(&mut self) {
        self.health = (self.health - 1).max(0);
    }

    /// Move to GameOver if health is exhausted
    ///
    /// Safe to call repeatedly; the score is recorded once per session.
    pub fn check_game_over(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.health > 0 {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.ended_at = Some(Instant::now());

        if !self.score_recorded {
            self.score_recorded = true;
            let timestamp = unix_timestamp();
            let rank = self.leaderboard.add_score(self.score, timestamp);
            log::info!(
                "Game over: score {} after {:.1}s (rank {:?})",
                self.score,
                self.elapsed_time().as_secs_f64(),
                rank
            );
            self.push_event(GameEvent::GameOver {
                score: self.score,
                timestamp,
            });
        }
        true
    }

    /// GameOver → Playing with fresh counters, timer and pool
    pub fn restart(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.pool.clear();
        self.score = 0;
        self.health = STARTING_HEALTH;
        self.effects = ActiveEffects::default();
        self.pointer = PointerState::default();
        self.frame = 0;
        self.score_recorded = false;
        self.started_at = Instant::now();
        self.ended_at = None;
        self.phase = GamePhase::Playing;
        log::info!("Session restarted");
        true
    }

    /// GameOver → Leaderboard (view toggle only)
    pub fn show_leaderboard(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Leaderboard;
        true
    }

    /// Leaderboard → GameOver
    pub fn hide_leaderboard(&mut self) -> bool {
        if self.phase != GamePhase::Leaderboard {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }

    /// Activate a power-up token (ignored outside Playing)
    pub fn apply_power_up(&mut self, power_up: PowerUp) {
        if !self.is_playing() {
            return;
        }
        self.effects.apply(power_up);
        log::info!("Power-up activated: {:?}", power_up);
        self.push_event(GameEvent::PowerUpActivated(power_up));
    }
}
