//! Platform layer
//!
//! Threads that feed the session from outside the frame loop:
//! - `spawn_task`: the background spawn scheduler
//! - `power_ups`: the power-up token producer

pub mod power_ups;
pub mod spawn_task;

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::sim::GameSession;

pub use power_ups::PowerUpFeed;
pub use spawn_task::SpawnTask;

/// The session as shared between the frame loop and background tasks
pub type SharedSession = Arc<Mutex<GameSession>>;

pub fn shared(session: GameSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Lock the session for one critical section
///
/// The session is plain data, so a panic elsewhere doesn't invalidate it.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Join a worker, giving up after `timeout`
///
/// Returns the thread's result if it finished in time.
pub(crate) fn join_within<T>(handle: JoinHandle<T>, timeout: Duration) -> Option<T> {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("Worker did not stop within {:?}", timeout);
            return None;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    handle.join().ok()
}
