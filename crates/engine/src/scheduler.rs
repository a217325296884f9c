// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The background scheduler: the singleton loop that alternates full scans
//! with per-owner incremental event scans, and detects when a full scan has
//! finished draining.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Datelike, Timelike};
use hubmirror_core::{Clock, EngineConfig, IngestionError, Owner};
use hubmirror_storage::ProcessedEventsSet;
use parking_lot::Mutex;

use crate::cache::CachingStore;
use crate::event_scanner::EventScanner;
use crate::filter::Filter;
use crate::heartbeat::run_with_heartbeat;
use crate::queue::{OwnerWork, WorkQueue, WorkUnit};

const TICK_INTERVAL: Duration = Duration::from_secs(20);
const FORCED_FULL_SCAN_LOCAL_HOUR: u32 = 3;
const NEARLY_DRAINED_THRESHOLD: usize = 10;
const LAST_FULL_SCAN_START_KEY: &str = "lastFullScanStart";

struct ScanTarget {
    owner: Owner,
    repo_names: Vec<String>,
    interval_secs: u64,
}

struct SchedulerState {
    full_scan_in_progress: bool,
    full_scan_requested: bool,
    last_full_scan_day_key: Option<i64>,
    owner_deadlines: HashMap<String, Instant>,
}

/// Drives the full-scan / event-scan state machine described in the design.
/// Every tick is isolated: a failure in one step is logged and the loop moves
/// on, it never escapes `tick()`.
pub struct Scheduler<C: Clock> {
    store: Arc<CachingStore>,
    processed: Arc<ProcessedEventsSet>,
    queue: Arc<WorkQueue<C>>,
    scanner: Arc<EventScanner<C>>,
    filter: Arc<dyn Filter>,
    clock: C,
    config: EngineConfig,
    state: Mutex<SchedulerState>,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(store: Arc<CachingStore>, processed: Arc<ProcessedEventsSet>, queue: Arc<WorkQueue<C>>, scanner: Arc<EventScanner<C>>, filter: Arc<dyn Filter>, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            processed,
            queue,
            scanner,
            filter,
            clock,
            config,
            state: Mutex::new(SchedulerState {
                full_scan_in_progress: false,
                full_scan_requested: false,
                last_full_scan_day_key: None,
                owner_deadlines: HashMap::new(),
            }),
        }
    }

    /// Record an external request (e.g. from the excluded HTTP API) for a
    /// full scan to begin on the next tick.
    pub fn request_full_scan(&self) {
        self.state.lock().full_scan_requested = true;
    }

    pub fn full_scan_in_progress(&self) -> bool {
        self.state.lock().full_scan_in_progress
    }

    /// Run forever at [`TICK_INTERVAL`]. Intended to be spawned as the
    /// engine's single scheduler task.
    pub async fn run_forever(self: Arc<Self>) {
        loop {
            self.tick().await;
            tokio::time::sleep(TICK_INTERVAL).await;
        }
    }

    pub async fn tick(&self) {
        self.detect_full_scan_completion();

        let mut full_scan_required = self.compute_full_scan_required();

        if !full_scan_required && self.queue.available_work() + self.queue.active_resources() <= NEARLY_DRAINED_THRESHOLD {
            full_scan_required |= self.run_due_event_scans().await;
        }

        if std::mem::take(&mut self.state.lock().full_scan_requested) {
            full_scan_required = true;
        }

        if full_scan_required && !self.full_scan_in_progress() {
            self.maybe_begin_full_scan();
        }
    }

    fn detect_full_scan_completion(&self) {
        let mut state = self.state.lock();
        if state.full_scan_in_progress && self.queue.is_drained() {
            state.full_scan_in_progress = false;
            tracing::info!("full scan complete");
        }
    }

    fn compute_full_scan_required(&self) -> bool {
        if local_time_from_epoch_ms(self.clock.epoch_ms()).hour() == FORCED_FULL_SCAN_LOCAL_HOUR {
            return true;
        }

        let store = self.store.store();
        match store.is_initialized() {
            Ok(false) => return true,
            Ok(true) => {}
            Err(err) => {
                tracing::error!(error = %err, "failed to check store initialization");
                return false;
            }
        }

        match store.get_string(LAST_FULL_SCAN_START_KEY) {
            Ok(Some(_)) => false,
            Ok(None) => true,
            Err(err) => {
                tracing::error!(error = %err, "failed to read lastFullScanStart");
                false
            }
        }
    }

    fn scan_targets(&self) -> Vec<ScanTarget> {
        let mut targets = Vec::new();

        for owner_target in &self.config.owner_targets {
            let repo_names = match &owner_target.owner {
                Owner::Organization(name) => self.store.get_organization(name).ok().flatten().map(|o| o.repository_names),
                Owner::User(name) => self.store.get_user_repositories(name).ok().flatten().map(|u| u.repository_names),
            };
            let Some(repo_names) = repo_names else { continue };
            if repo_names.is_empty() {
                continue;
            }
            let interval_secs = owner_target.event_scan_interval_secs.unwrap_or(self.config.global_event_scan_interval_secs);
            targets.push(ScanTarget { owner: owner_target.owner.clone(), repo_names, interval_secs });
        }

        let mut repo_lists: HashMap<String, (Owner, Vec<String>, u64)> = HashMap::new();
        for repo in &self.config.individual_repos {
            let interval_secs = repo.event_scan_interval_secs.unwrap_or(self.config.global_event_scan_interval_secs);
            let entry = repo_lists
                .entry(repo.owner.to_string())
                .or_insert_with(|| (repo.owner.clone(), Vec::new(), interval_secs));
            entry.1.push(repo.repo_name.clone());
            entry.2 = entry.2.min(interval_secs);
        }
        for (_, (owner, repo_names, interval_secs)) in repo_lists {
            targets.push(ScanTarget { owner, repo_names, interval_secs });
        }

        targets
    }

    /// Run the event scanner for every owner whose deadline has elapsed.
    /// Returns whether any of them reported that a full scan is required.
    async fn run_due_event_scans(&self) -> bool {
        let now = self.clock.now();
        let last_full_scan_start_ms = self.store.store().get_string(LAST_FULL_SCAN_START_KEY).ok().flatten().and_then(|raw| raw.trim().parse().ok());

        let mut promoted = false;
        for target in self.scan_targets() {
            let key = target.owner.to_string();
            let due = self.state.lock().owner_deadlines.get(&key).map(|deadline| now >= *deadline).unwrap_or(true);
            if !due {
                continue;
            }

            let scanner = Arc::clone(&self.scanner);
            let owner = target.owner.clone();
            let repo_names = target.repo_names.clone();
            let outcome = run_with_heartbeat(move |progress| async move { scanner.scan_owner(&owner, &repo_names, last_full_scan_start_ms, &progress).await }).await;

            match outcome {
                Some(Ok(result)) => {
                    // The scanner itself already persisted the fingerprints
                    // (including on a cross-owner-move abort); nothing left
                    // to commit here but the `fullScanRequired` promotion.
                    promoted |= result.full_scan_required;
                }
                Some(Err(err)) => {
                    tracing::warn!(error = %err, owner = %key, "event scan failed, abandoning this scan iteration");
                }
                None => {
                    tracing::warn!(owner = %key, "event scan stalled past its heartbeat bound, abandoning this scan iteration");
                }
            }

            self.state.lock().owner_deadlines.insert(key, now + Duration::from_secs(target.interval_secs));
        }
        promoted
    }

    fn maybe_begin_full_scan(&self) {
        let day_key = local_day_key(self.clock.epoch_ms());
        if self.state.lock().last_full_scan_day_key == Some(day_key) {
            return;
        }
        if let Err(err) = self.begin_full_scan(day_key) {
            tracing::error!(error = %err, "failed to begin full scan");
        }
    }

    fn begin_full_scan(&self, day_key: i64) -> Result<(), IngestionError> {
        let store = self.store.store();
        if !store.is_initialized()? {
            store.initialize()?;
        }
        store.put_string(LAST_FULL_SCAN_START_KEY, &self.clock.epoch_ms().to_string())?;
        self.processed.clear()?;

        for owner_target in &self.config.owner_targets {
            if self.filter.allow_owner(&owner_target.owner) {
                self.queue.push(WorkUnit::Owner(OwnerWork::full(owner_target.owner.clone())));
            }
        }
        let mut repo_lists: HashMap<String, (Owner, Vec<String>)> = HashMap::new();
        for repo in &self.config.individual_repos {
            let entry = repo_lists.entry(repo.owner.to_string()).or_insert_with(|| (repo.owner.clone(), Vec::new()));
            entry.1.push(repo.repo_name.clone());
        }
        for (_, (owner, repo_names)) in repo_lists {
            if self.filter.allow_owner(&owner) {
                self.queue.push(WorkUnit::Owner(OwnerWork::repo_list(owner, repo_names)));
            }
        }

        let mut state = self.state.lock();
        state.full_scan_in_progress = true;
        state.last_full_scan_day_key = Some(day_key);
        state.owner_deadlines.clear();
        tracing::info!("full scan started");
        Ok(())
    }
}

/// Local-time view of an epoch-millis timestamp, read from the engine's
/// injected [`Clock`] rather than the wall clock directly, so scheduler tests
/// stay deterministic under a [`hubmirror_core::FakeClock`].
fn local_time_from_epoch_ms(epoch_ms: u64) -> chrono::DateTime<chrono::Local> {
    chrono::DateTime::from_timestamp_millis(epoch_ms as i64).unwrap_or_default().with_timezone(&chrono::Local)
}

fn local_day_key(epoch_ms: u64) -> i64 {
    let local = local_time_from_epoch_ms(epoch_ms);
    local.year() as i64 * 1000 + local.ordinal() as i64
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
