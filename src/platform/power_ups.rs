//! Power-up token feed
//!
//! A producer thread rolls for a power-up every period and sends tokens over
//! a channel. The frame loop drains it without blocking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::join_within;
use crate::sim::PowerUp;

/// Default time between power-up rolls
pub const POWER_UP_PERIOD: Duration = Duration::from_secs(5);
/// Chance that a roll produces a token
pub const POWER_UP_CHANCE: f64 = 1.0 / 3.0;

/// Granularity of the producer's sleep, so stop() is prompt
const POLL_SLICE: Duration = Duration::from_millis(20);

pub struct PowerUpFeed {
    rx: Receiver<PowerUp>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PowerUpFeed {
    /// Start the producer thread
    pub fn start(seed: u64, period: Duration) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("power-ups".into())
            .spawn(move || produce(tx, flag, seed, period))?;

        Ok(Self {
            rx,
            running,
            handle: Some(handle),
        })
    }

    /// Build a feed from an existing channel (no producer thread)
    pub fn from_receiver(rx: Receiver<PowerUp>) -> Self {
        Self {
            rx,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// All tokens received since the last poll
    pub fn poll(&self) -> Vec<PowerUp> {
        self.rx.try_iter().collect()
    }

    pub fn stop(mut self, timeout: Duration) -> bool {
        self.running.store(false, Ordering::Release);
        match self.handle.take() {
            Some(handle) => join_within(handle, timeout).is_some(),
            None => true,
        }
    }
}

impl Drop for PowerUpFeed {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

fn produce(tx: Sender<PowerUp>, running: Arc<AtomicBool>, seed: u64, period: Duration) {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut next_roll = Instant::now() + period;

    while running.load(Ordering::Acquire) {
        if Instant::now() < next_roll {
            thread::sleep(POLL_SLICE.min(period));
            continue;
        }
        next_roll += period;

        if !rng.random_bool(POWER_UP_CHANCE) {
            continue;
        }
        let power_up = if rng.random_bool(0.5) {
            PowerUp::SlowMotion
        } else {
            PowerUp::DoublePoints
        };
        log::debug!("Power-up produced: {:?}", power_up);
        if tx.send(power_up).is_err() {
            // Receiver gone
            break;
        }
    }
}
