// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker stall detection.
//!
//! The actual abort is performed by wrapping each unit's `process` future in
//! `tokio::time::timeout` — that alone gets the externally observable
//! "interrupt and requeue" behavior without a second task sending a
//! cooperative-cancellation signal across a non-cancellation-safe await.
//! [`Watchdog`] itself exists so a liveness check can still run on its own
//! 15-second cadence for logging, sharing the "independent progress-probe
//! task" idiom with [`crate::heartbeat`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

pub const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(2 * 60);
pub const WATCHDOG_CHECK_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Clone, Default)]
pub struct Watchdog {
    started_at: Arc<Mutex<Option<Instant>>>,
}

impl Watchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) {
        *self.started_at.lock() = Some(Instant::now());
    }

    pub fn stop(&self) {
        *self.started_at.lock() = None;
    }

    /// Whether the in-flight unit (if any) has exceeded [`WATCHDOG_TIMEOUT`].
    /// Used only for liveness logging; the actual abort is `timeout`-driven.
    pub fn is_stalled(&self) -> bool {
        self.started_at.lock().map(|started| started.elapsed() >= WATCHDOG_TIMEOUT).unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
