// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level `Engine` handle: wires the content store, change-event log,
//! processed-events set, work queue, worker pool, event scanner, and
//! background scheduler into one constructible unit and exposes the three
//! externally observable behaviors (trigger a full scan, read recent
//! changes, read mirrored records) that the excluded HTTP read API and CLI
//! would wrap.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use hubmirror_adapters::UpstreamClient;
use hubmirror_core::{Clock, EngineConfig, IngestionError, ResourceChangeEvent, SystemClock};
use hubmirror_storage::{ChangeEventLog, ProcessedEventsSet};

use crate::cache::CachingStore;
use crate::event_scanner::EventScanner;
use crate::filter::{AllowAll, Filter};
use crate::queue::{PacingConfig, WorkQueue};
use crate::scheduler::Scheduler;
use crate::worker_pool::WorkerPool;

const CACHE_CAPACITY: usize = 4096;

/// Every background task the engine owns, returned by [`Engine::spawn`] so
/// the caller can hold or abort them.
pub struct EngineHandle {
    pub worker_tasks: Vec<tokio::task::JoinHandle<()>>,
    pub scheduler_task: tokio::task::JoinHandle<()>,
}

pub struct Engine<C: Clock + 'static = SystemClock> {
    store: Arc<CachingStore>,
    change_log: Arc<ChangeEventLog>,
    queue: Arc<WorkQueue<C>>,
    worker_pool: Arc<WorkerPool<C>>,
    scheduler: Arc<Scheduler<C>>,
    clock: C,
}

impl Engine<SystemClock> {
    /// Build the engine rooted at `db_dir`, reconciling it against `config`
    /// first (quarantining the store into `old/` on a configuration-hash
    /// mismatch). Refuses to start if `config` itself is invalid.
    pub fn new(db_dir: impl Into<PathBuf>, config: EngineConfig, upstream: Arc<dyn UpstreamClient>, filter: Arc<dyn Filter>) -> Result<Self, IngestionError> {
        Self::with_clock(db_dir, config, upstream, filter, SystemClock)
    }
}

impl<C: Clock + 'static> Engine<C> {
    pub fn with_clock(db_dir: impl Into<PathBuf>, config: EngineConfig, upstream: Arc<dyn UpstreamClient>, filter: Arc<dyn Filter>, clock: C) -> Result<Self, IngestionError> {
        config.validate()?;
        let db_dir = db_dir.into();

        let store = Arc::new(CachingStore::new(&db_dir, NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN)));
        if store.store().reconcile_against_config(&config, clock.epoch_ms())? {
            tracing::warn!("configuration drift detected, previous store contents quarantined under old/");
        }

        let change_log = Arc::new(ChangeEventLog::new(&db_dir));
        let processed = Arc::new(ProcessedEventsSet::load(&db_dir)?);

        let pacing = PacingConfig {
            configured_requests_per_hour: config.global_hourly_request_limit,
            configured_pause_ms: config.global_pause_ms,
        };
        let queue = Arc::new(WorkQueue::new(clock.clone(), pacing));

        let worker_pool = Arc::new(WorkerPool::new(Arc::clone(&store), Arc::clone(&change_log), Arc::clone(&upstream), Arc::clone(&queue), Arc::clone(&filter), clock.clone()));

        let scanner = Arc::new(EventScanner::new(upstream, Arc::clone(&processed), Arc::clone(&queue), Arc::clone(&filter)));
        let scheduler = Arc::new(Scheduler::new(Arc::clone(&store), processed, Arc::clone(&queue), scanner, filter, clock.clone(), config));

        Ok(Self { store, change_log, queue, worker_pool, scheduler, clock })
    }

    /// Spawn the worker pool and the scheduler's forever-loop as background
    /// tasks. The returned handle is the caller's only way to observe or
    /// abort them; dropping it does not stop the tasks.
    pub fn spawn(self: &Arc<Self>) -> EngineHandle {
        let worker_tasks = Arc::clone(&self.worker_pool).spawn();
        let scheduler = Arc::clone(&self.scheduler);
        let scheduler_task = tokio::spawn(async move { scheduler.run_forever().await });
        EngineHandle { worker_tasks, scheduler_task }
    }

    /// Request a full scan on the next scheduler tick, bypassing the usual
    /// once-per-calendar-day gate.
    pub fn trigger_full_scan(&self) {
        self.scheduler.request_full_scan();
    }

    /// All change events with `time_ms >= since_ms`, ascending by time. Also
    /// opportunistically garbage-collects entries past the retention window.
    pub fn recent_changes_since(&self, since_ms: u64) -> Result<Vec<ResourceChangeEvent>, IngestionError> {
        Ok(self.change_log.recent_since(since_ms, self.clock.epoch_ms())?)
    }

    pub fn full_scan_in_progress(&self) -> bool {
        self.scheduler.full_scan_in_progress()
    }

    pub fn store(&self) -> &Arc<CachingStore> {
        &self.store
    }

    pub fn queue(&self) -> &Arc<WorkQueue<C>> {
        &self.queue
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn scheduler(&self) -> &Arc<Scheduler<C>> {
        &self.scheduler
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn change_log(&self) -> &Arc<ChangeEventLog> {
        &self.change_log
    }
}

/// Convenience constructor for an engine with the default advisory filter.
pub fn allow_all_filter() -> Arc<dyn Filter> {
    Arc::new(AllowAll)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
