// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The work queue: four typed, deduplicated pending lists plus the adaptive
//! pacing gate that throttles every upstream call the engine makes.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hubmirror_adapters::QuotaSnapshot;
use hubmirror_core::{Clock, Owner};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::QueueError;

/// Estimated upstream request cost of one polled unit, used by the
/// quota-blind pacing formula.
fn estimated_requests(kind: WorkKind) -> u64 {
    match kind {
        WorkKind::Owner => 5,
        WorkKind::Repository => 20,
        WorkKind::Issue => 3,
        WorkKind::User => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkKind {
    Owner,
    Repository,
    Issue,
    User,
}

/// An owner work unit. `repo_names` is `Some` for a "repo-list" owner — one
/// assembled from individually-configured repos rather than a full
/// organization/user target — and carries the preresolved, sorted repo names
/// so the worker does not need to list them from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerWork {
    pub owner: Owner,
    pub repo_names: Option<Vec<String>>,
}

impl OwnerWork {
    pub fn full(owner: Owner) -> Self {
        Self { owner, repo_names: None }
    }

    pub fn repo_list(owner: Owner, mut repo_names: Vec<String>) -> Self {
        repo_names.sort_unstable();
        Self { owner, repo_names: Some(repo_names) }
    }

    fn key(&self) -> String {
        match &self.repo_names {
            Some(names) => format!("{}:repolist:{}", self.owner, names.join(",")),
            None => self.owner.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryWork {
    pub owner: String,
    pub repo_name: String,
    /// The upstream repository id, when already known from an owner-level
    /// repo listing. `None` for repo-list owners, whose individual repos
    /// were configured by name only.
    pub repository_id: Option<u64>,
}

impl RepositoryWork {
    fn key(&self) -> String {
        format!("repository:{}/{}", self.owner, self.repo_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueWork {
    pub owner: String,
    pub repo_name: String,
    pub number: u64,
}

impl IssueWork {
    fn key(&self) -> String {
        format!("issue:{}/{}/{}", self.owner, self.repo_name, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWork {
    pub login: String,
}

impl UserWork {
    fn key(&self) -> String {
        format!("user:{}", self.login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    Owner(OwnerWork),
    Repository(RepositoryWork),
    Issue(IssueWork),
    User(UserWork),
}

impl WorkUnit {
    pub fn kind(&self) -> WorkKind {
        match self {
            WorkUnit::Owner(_) => WorkKind::Owner,
            WorkUnit::Repository(_) => WorkKind::Repository,
            WorkUnit::Issue(_) => WorkKind::Issue,
            WorkUnit::User(_) => WorkKind::User,
        }
    }

    fn key(&self) -> String {
        match self {
            WorkUnit::Owner(u) => u.key(),
            WorkUnit::Repository(u) => u.key(),
            WorkUnit::Issue(u) => u.key(),
            WorkUnit::User(u) => u.key(),
        }
    }
}

/// Tunable rate-limiting configuration, taken from [`hubmirror_core::EngineConfig`].
#[derive(Debug, Clone, Copy)]
pub struct PacingConfig {
    pub configured_requests_per_hour: u64,
    pub configured_pause_ms: u64,
}

const RESERVE: u64 = 250;
const MAX_QUOTA_AWARE_WAIT_SECS: u64 = 10;

struct Inner {
    owners: VecDeque<OwnerWork>,
    repositories: VecDeque<RepositoryWork>,
    issues: VecDeque<IssueWork>,
    users: VecDeque<UserWork>,
    pending_keys: HashSet<String>,
    active_keys: HashSet<String>,
    ever_seen_users: HashSet<String>,
    next_work_available_at: Instant,
    stop_accepting: bool,
    last_quota: Option<QuotaSnapshot>,
}

impl Inner {
    fn push(&mut self, unit: WorkUnit) -> bool {
        let key = unit.key();
        if self.pending_keys.contains(&key) || self.active_keys.contains(&key) {
            return false;
        }
        self.pending_keys.insert(key);
        match unit {
            WorkUnit::Owner(u) => self.owners.push_back(u),
            WorkUnit::Repository(u) => self.repositories.push_back(u),
            WorkUnit::Issue(u) => self.issues.push_back(u),
            WorkUnit::User(u) => self.users.push_back(u),
        }
        true
    }

    fn available_work(&self) -> usize {
        self.owners.len() + self.repositories.len() + self.issues.len() + self.users.len()
    }

    fn active_resources(&self) -> usize {
        self.active_keys.len()
    }

    fn try_pop(&mut self) -> Option<WorkUnit> {
        if self.stop_accepting {
            return None;
        }
        if let Some(u) = self.owners.pop_front() {
            return Some(self.activate(WorkUnit::Owner(u)));
        }
        if let Some(u) = self.repositories.pop_front() {
            return Some(self.activate(WorkUnit::Repository(u)));
        }
        if let Some(u) = self.issues.pop_front() {
            return Some(self.activate(WorkUnit::Issue(u)));
        }
        if let Some(u) = self.users.pop_front() {
            return Some(self.activate(WorkUnit::User(u)));
        }
        None
    }

    fn activate(&mut self, unit: WorkUnit) -> WorkUnit {
        let key = unit.key();
        self.pending_keys.remove(&key);
        self.active_keys.insert(key);
        unit
    }
}

/// The deduplicated, adaptively-paced queue of pending ingestion work.
pub struct WorkQueue<C: Clock> {
    inner: Mutex<Inner>,
    notify: Notify,
    clock: C,
    pacing: PacingConfig,
}

impl<C: Clock> WorkQueue<C> {
    pub fn new(clock: C, pacing: PacingConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                owners: VecDeque::new(),
                repositories: VecDeque::new(),
                issues: VecDeque::new(),
                users: VecDeque::new(),
                pending_keys: HashSet::new(),
                active_keys: HashSet::new(),
                ever_seen_users: HashSet::new(),
                next_work_available_at: clock.now(),
                stop_accepting: false,
                last_quota: None,
            }),
            notify: Notify::new(),
            clock,
            pacing,
        }
    }

    /// Enqueue a unit, respecting structural dedup. Owner/Repository/Issue
    /// units are always subject only to the pending/active dedup; `push_user`
    /// additionally consults the process-lifetime "ever-seen" set.
    pub fn push(&self, unit: WorkUnit) -> bool {
        let mut inner = self.inner.lock();
        let added = inner.push(unit);
        drop(inner);
        if added {
            self.notify.notify_waiters();
        }
        added
    }

    /// Enqueue a user, skipping it if this login has already been fetched
    /// once this process lifetime (unless `retry` bypasses that rule).
    pub fn push_user(&self, login: impl Into<String>, retry: bool) -> bool {
        let login = login.into();
        let mut inner = self.inner.lock();
        if !retry && inner.ever_seen_users.contains(&login) {
            return false;
        }
        let added = inner.push(WorkUnit::User(UserWork { login: login.clone() }));
        if added {
            inner.ever_seen_users.insert(login);
        }
        drop(inner);
        if added {
            self.notify.notify_waiters();
        }
        added
    }

    pub fn stop_accepting(&self) {
        self.inner.lock().stop_accepting = true;
        self.notify.notify_waiters();
    }

    pub fn available_work(&self) -> usize {
        self.inner.lock().available_work()
    }

    pub fn active_resources(&self) -> usize {
        self.inner.lock().active_resources()
    }

    /// Whether the current scan may be considered drained: nothing queued,
    /// nothing in flight.
    pub fn is_drained(&self) -> bool {
        let inner = self.inner.lock();
        inner.available_work() == 0 && inner.active_resources() == 0
    }

    /// Attempt to pull one unit, in priority order Owner > Repository > Issue
    /// > User. Returns `None` if the pacing gate has not yet opened, the
    /// queue is empty, or `stop_accepting` has been set.
    pub fn poll(&self) -> Option<WorkUnit> {
        let mut inner = self.inner.lock();
        if self.clock.now() < inner.next_work_available_at {
            return None;
        }
        inner.try_pop()
    }

    /// Wait until either new work is pushed or the pacing deadline may have
    /// passed, whichever comes first. Does not guarantee work is available
    /// on return; callers must still `poll`.
    pub async fn wait_for_available_work(&self) {
        let notified = self.notify.notified();
        tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep(Duration::from_millis(20)) => {}
        }
    }

    /// Record that a previously-polled unit finished (successfully or not).
    /// Must match a unit this queue actually handed out via `poll`.
    pub fn mark_processed(&self, unit: &WorkUnit) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        let key = unit.key();
        if !inner.active_keys.remove(&key) {
            return Err(QueueError::UnmatchedMarkProcessed(key));
        }
        Ok(())
    }

    /// Advance the pacing deadline using the most recent quota snapshot, if
    /// any was supplied via `record_quota`, falling back to the quota-blind
    /// formula otherwise.
    pub fn advance_pacing(&self, kind: WorkKind) {
        let mut inner = self.inner.lock();
        let wait = self.compute_wait(kind, inner.last_quota);
        inner.next_work_available_at = self.clock.now() + wait;
    }

    /// Let the Event Scanner voluntarily pace itself by `k` estimated units
    /// of the given kind, without having polled anything.
    pub fn wait_if_needed(&self, kind: WorkKind, units: u64) {
        let mut inner = self.inner.lock();
        let mut wait = Duration::ZERO;
        for _ in 0..units {
            wait += self.compute_wait(kind, inner.last_quota);
        }
        let candidate = self.clock.now() + wait;
        if candidate > inner.next_work_available_at {
            inner.next_work_available_at = candidate;
        }
    }

    pub fn record_quota(&self, quota: Option<QuotaSnapshot>) {
        self.inner.lock().last_quota = quota;
    }

    pub fn next_work_available_at(&self) -> Instant {
        self.inner.lock().next_work_available_at
    }

    fn compute_wait(&self, kind: WorkKind, quota: Option<QuotaSnapshot>) -> Duration {
        let requests = estimated_requests(kind);
        match quota {
            Some(q) => {
                let remaining = q.remaining.saturating_sub(RESERVE).max(1);
                let target_rps = q.total_hourly_limit as f64 / 3600.0;
                let wait_seconds = (q.seconds_to_reset as f64 - remaining as f64 / target_rps).clamp(0.0, MAX_QUOTA_AWARE_WAIT_SECS as f64);
                if wait_seconds <= 0.0 {
                    Duration::from_millis(requests * self.pacing.configured_pause_ms)
                } else {
                    Duration::from_secs_f64(wait_seconds)
                }
            }
            None => {
                let seconds_per_request = 3600.0 / self.pacing.configured_requests_per_hour as f64;
                Duration::from_secs_f64(requests as f64 * seconds_per_request)
            }
        }
    }
}

/// Convenience alias for an `Arc`-shared queue, the shape every other engine
/// component actually holds.
pub type SharedWorkQueue<C> = Arc<WorkQueue<C>>;

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
