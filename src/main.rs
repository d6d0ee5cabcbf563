//! Fruit Slice entry point
//!
//! Headless driver: runs the frame loop with the background spawner and
//! power-up feed, and plays a simple automated blade.
//!
//! Usage: `fruit-slice [settings.json] [easy|normal|hard]`

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use fruit_slice::audio::AudioManager;
use fruit_slice::highscores::unix_timestamp;
use fruit_slice::persistence::{JsonFileStore, LeaderboardStore};
use fruit_slice::platform::{self, PowerUpFeed, SpawnTask};
use fruit_slice::platform::power_ups::POWER_UP_PERIOD;
use fruit_slice::sim::{GameEvent, GameSession, InputEvent, SpawnScheduler, handle_input, tick};
use fruit_slice::{Difficulty, Settings};

/// Upper bound on a headless run
const MAX_RUN: Duration = Duration::from_secs(60);
/// How long background threads get to wind down
const STOP_TIMEOUT: Duration = Duration::from_secs(1);
/// Frames between status lines
const STATUS_EVERY: u64 = 120;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let mut settings = Settings::load(&settings_path);
    if let Some(name) = args.next() {
        match Difficulty::from_str(&name) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => log::warn!("Unknown difficulty '{name}', keeping {}", settings.difficulty.as_str()),
        }
    }
    log::info!(
        "Difficulty {}, launching from {:?}",
        settings.difficulty.as_str(),
        settings.launch_edge
    );

    let store = JsonFileStore::new(&settings.leaderboard_path);
    let leaderboard = store.load().unwrap_or_else(|e| {
        log::warn!("{e}; starting with an empty leaderboard");
        Default::default()
    });
    match leaderboard.top_score() {
        Some(best) => log::info!("Best score so far: {best}"),
        None => log::info!("No scores recorded yet"),
    }

    let seed = settings.seed.unwrap_or_else(unix_timestamp);
    log::info!("Seed {seed}");
    let session = platform::shared(
        GameSession::with_tuning(seed, settings.spawn_tuning()).with_leaderboard(leaderboard),
    );

    let mut audio = AudioManager::default();
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let spawner = match SpawnTask::start(
        Arc::clone(&session),
        SpawnScheduler::new(settings.spawn_interval()),
    ) {
        Ok(task) => task,
        Err(e) => {
            log::error!("Failed to start spawn task: {e}");
            return;
        }
    };
    let power_ups = match PowerUpFeed::start(seed.wrapping_add(1), POWER_UP_PERIOD) {
        Ok(feed) => Some(feed),
        Err(e) => {
            log::warn!("Power-ups disabled: {e}");
            None
        }
    };

    let mut blade = AutoBlade::new(seed.wrapping_add(2));
    let frame_interval = settings.frame_interval();
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();

        let (events, done) = {
            let mut session = platform::lock_session(&session);
            tick(&mut session);

            for event in blade.next_moves(&session) {
                handle_input(&mut session, event);
            }
            if let Some(feed) = &power_ups {
                for power_up in feed.poll() {
                    session.apply_power_up(power_up);
                }
            }

            if session.frame % STATUS_EVERY == 0 && session.is_playing() {
                log::info!(
                    "Frame {}: {} active, score {}, health {}",
                    session.frame,
                    session.active_count(),
                    session.score,
                    session.health
                );
                if log::log_enabled!(log::Level::Trace)
                    && let Ok(json) = serde_json::to_string(&session.snapshot())
                {
                    log::trace!("{json}");
                }
            }

            let done = !session.is_playing() || session.quit_requested;
            (session.drain_events(), done)
        };

        audio.handle_events(&events);
        for event in &events {
            if let GameEvent::GameOver { score, timestamp } = event {
                let leaderboard = platform::lock_session(&session).leaderboard.clone();
                let rank = leaderboard
                    .entries
                    .iter()
                    .position(|e| e.score == *score && e.timestamp == *timestamp);
                match rank {
                    Some(0) => log::info!("Final score: {score} (new best)"),
                    Some(i) => log::info!("Final score: {score} (rank {})", i + 1),
                    None => log::info!(
                        "Final score: {score} (best {})",
                        leaderboard.top_score().unwrap_or(*score)
                    ),
                }
                if let Err(e) = store.save(&leaderboard) {
                    log::error!("{e}");
                }
            }
        }

        if done {
            break;
        }
        if started.elapsed() >= MAX_RUN {
            log::info!("Run limit reached");
            break;
        }

        if let Some(rest) = frame_interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    if spawner.stop(STOP_TIMEOUT).is_none() {
        log::warn!("Spawn task did not stop cleanly");
    }
    if let Some(feed) = power_ups
        && !feed.stop(STOP_TIMEOUT)
    {
        log::warn!("Power-up feed did not stop cleanly");
    }

    let session = platform::lock_session(&session);
    for (rank, entry) in session.leaderboard.entries.iter().enumerate() {
        log::info!("#{:<2} {:>6}  ({})", rank + 1, entry.score, entry.timestamp);
    }
}

/// Stand-in for a player: swipes across a random target now and then
struct AutoBlade {
    rng: Pcg32,
}

impl AutoBlade {
    /// Chance per frame of starting a swipe
    const SWIPE_CHANCE: f64 = 0.08;
    /// Chance of swinging at a bomb when one is picked
    const BOMB_RECKLESSNESS: f64 = 0.15;
    const SWIPE_HALF_LENGTH: f64 = 60.0;

    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn next_moves(&mut self, session: &GameSession) -> Vec<InputEvent> {
        if !session.is_playing() || !self.rng.random_bool(Self::SWIPE_CHANCE) {
            return Vec::new();
        }

        let targets: Vec<DVec2> = session
            .pool
            .iter_active()
            .filter(|(_, p)| p.is_sliceable())
            .filter(|(_, p)| !p.kind.is_bomb() || self.rng.random_bool(Self::BOMB_RECKLESSNESS))
            .map(|(_, p)| p.position)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }
        let target = targets[self.rng.random_range(0..targets.len())];

        // Miss by a little, sometimes
        let aim = target + DVec2::new(self.rng.random_range(-20.0..20.0), self.rng.random_range(-20.0..20.0));
        let angle: f64 = self.rng.random_range(0.0..std::f64::consts::TAU);
        let reach = DVec2::from_angle(angle) * Self::SWIPE_HALF_LENGTH;
        let (from, to) = (aim - reach, aim + reach);

        // Lifting first ends the previous stroke, so the jump to `from` can't cut anything
        vec![
            InputEvent::PointerUp,
            InputEvent::PointerDown,
            InputEvent::PointerMoved { x: from.x, y: from.y },
            InputEvent::PointerMoved { x: to.x, y: to.y },
        ]
    }
}
