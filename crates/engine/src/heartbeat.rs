// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A generic progress-probe runner: runs a task on a helper task and cancels
//! it if no progress has been reported within a bound. Used to guard each
//! event-scan pass, and shares its idiom with the worker pool's `Watchdog`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const CHECK_INTERVAL: Duration = Duration::from_secs(1);
const PROGRESS_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A handle the guarded task uses to report that it is still making
/// progress. Cloned freely; cheap to call often.
#[derive(Clone)]
pub struct ProgressHandle {
    last_ping: Arc<Mutex<Instant>>,
}

impl ProgressHandle {
    /// A freestanding handle, useful for calling a heartbeat-guarded
    /// operation directly in a test without going through
    /// [`run_with_heartbeat`] itself.
    pub fn new() -> Self {
        Self { last_ping: Arc::new(Mutex::new(Instant::now())) }
    }

    pub fn ping(&self) {
        *self.last_ping.lock() = Instant::now();
    }

    fn elapsed_since_ping(&self) -> Duration {
        self.last_ping.lock().elapsed()
    }
}

/// Run `task` on a helper task, polling every [`CHECK_INTERVAL`] for progress.
/// If the helper goes [`PROGRESS_TIMEOUT`] without a `ping`, it is aborted and
/// this returns `None`.
pub async fn run_with_heartbeat<F, Fut, T>(task: F) -> Option<T>
where
    F: FnOnce(ProgressHandle) -> Fut,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let progress = ProgressHandle::new();
    let handle: JoinHandle<T> = tokio::spawn(task(progress.clone()));
    tokio::pin!(handle);

    loop {
        tokio::select! {
            result = &mut handle => {
                return result.ok();
            }
            _ = tokio::time::sleep(CHECK_INTERVAL) => {
                if progress.elapsed_since_ping() >= PROGRESS_TIMEOUT {
                    handle.abort();
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
