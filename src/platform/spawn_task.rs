//! Background spawn task
//!
//! Runs the [`SpawnScheduler`] on its own cadence. Each evaluation holds the
//! session lock for its whole critical section; the frame loop never waits on
//! this thread except at shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{SharedSession, join_within, lock_session};
use crate::sim::SpawnScheduler;

pub struct SpawnTask {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<SpawnScheduler>>,
}

impl SpawnTask {
    /// Start the spawn loop on a named thread
    pub fn start(session: SharedSession, mut scheduler: SpawnScheduler) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let interval = scheduler.interval;

        let handle = thread::Builder::new()
            .name("spawner".into())
            .spawn(move || {
                log::debug!("Spawn task started ({:?} interval)", interval);
                while flag.load(Ordering::Acquire) {
                    {
                        let mut session = lock_session(&session);
                        scheduler.tick(&mut session);
                    }
                    thread::sleep(interval);
                }
                log::debug!("Spawn task stopped");
                scheduler
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Clear the loop flag and join with a bounded wait
    ///
    /// Returns the scheduler state if the thread exited in time.
    pub fn stop(mut self, timeout: Duration) -> Option<SpawnScheduler> {
        self.running.store(false, Ordering::Release);
        self.handle
            .take()
            .and_then(|handle| join_within(handle, timeout))
    }
}

impl Drop for SpawnTask {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::shared;
    use crate::sim::GameSession;

    #[test]
    fn test_spawns_and_stops() {
        let session = shared(GameSession::new(3));
        let task = SpawnTask::start(
            Arc::clone(&session),
            SpawnScheduler::new(Duration::from_millis(5)),
        )
        .expect("spawn thread");

        thread::sleep(Duration::from_millis(50));
        assert!(task.is_running());
        assert!(task.stop(Duration::from_secs(1)).is_some());
        assert!(lock_session(&session).active_count() > 0);
    }
}
