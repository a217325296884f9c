// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed-size worker pool: pulls units from the [`crate::queue::WorkQueue`]
//! in priority order, performs the corresponding upstream fetch, and writes
//! the result to the cache/store.

use std::sync::Arc;

use hubmirror_adapters::{RepoSummary, UpstreamClient};
use hubmirror_core::{canonically_equal, IngestionError, IssueEvent, IssueEventKind, Organization, Owner, ResourceChangeEvent, UserRepositories};
use hubmirror_storage::ChangeEventLog;
use tracing::Instrument;

use crate::cache::CachingStore;
use crate::filter::Filter;
use crate::queue::{IssueWork, OwnerWork, RepositoryWork, UserWork, WorkQueue, WorkUnit};
use crate::watchdog::{Watchdog, WATCHDOG_TIMEOUT};

pub const WORKER_COUNT: usize = 5;

pub struct WorkerPool<C: hubmirror_core::Clock> {
    store: Arc<CachingStore>,
    change_log: Arc<ChangeEventLog>,
    upstream: Arc<dyn UpstreamClient>,
    queue: Arc<WorkQueue<C>>,
    filter: Arc<dyn Filter>,
    clock: C,
}

impl<C: hubmirror_core::Clock + 'static> WorkerPool<C> {
    pub fn new(
        store: Arc<CachingStore>,
        change_log: Arc<ChangeEventLog>,
        upstream: Arc<dyn UpstreamClient>,
        queue: Arc<WorkQueue<C>>,
        filter: Arc<dyn Filter>,
        clock: C,
    ) -> Self {
        Self { store, change_log, upstream, queue, filter, clock }
    }

    /// Spawn [`WORKER_COUNT`] worker tasks. Each runs forever until its
    /// `JoinHandle` is aborted by the owner.
    pub fn spawn(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        (0..WORKER_COUNT)
            .map(|idx| {
                let pool = Arc::clone(&self);
                tokio::spawn(async move { pool.run_worker(idx).await })
            })
            .collect()
    }

    async fn run_worker(&self, idx: usize) {
        let watchdog = Watchdog::new();
        loop {
            self.queue.wait_for_available_work().await;
            let Some(unit) = self.queue.poll() else {
                continue;
            };

            let span = tracing::info_span!("worker.process", worker = idx, unit = ?unit);
            let kind = unit.kind();
            watchdog.begin();
            let outcome = tokio::time::timeout(WATCHDOG_TIMEOUT, self.process(unit.clone())).instrument(span.clone()).await;
            watchdog.stop();

            let needs_requeue = match &outcome {
                Ok(Ok(())) => {
                    span.in_scope(|| tracing::info!("processed ok"));
                    false
                }
                Ok(Err(err)) => {
                    span.in_scope(|| tracing::warn!(error = %err, "processing failed, requeuing"));
                    true
                }
                Err(_timeout) => {
                    span.in_scope(|| tracing::warn!("processing stalled past watchdog timeout, requeuing"));
                    true
                }
            };

            self.queue.advance_pacing(kind);
            // mark_processed must run before the requeue push: the unit's key
            // stays in the active set until then, and push() rejects anything
            // already active, silently dropping the requeue otherwise.
            if let Err(err) = self.queue.mark_processed(&unit) {
                span.in_scope(|| tracing::error!(error = %err, "mark_processed invariant violated"));
            }
            if needs_requeue {
                self.queue.push(unit.clone());
            }
        }
    }

    async fn process(&self, unit: WorkUnit) -> Result<(), IngestionError> {
        match unit {
            WorkUnit::Owner(work) => self.process_owner(work).await,
            WorkUnit::Repository(work) => self.process_repository(work).await,
            WorkUnit::Issue(work) => self.process_issue(work).await,
            WorkUnit::User(work) => self.process_user(work).await,
        }
    }

    async fn process_owner(&self, work: OwnerWork) -> Result<(), IngestionError> {
        let summaries: Vec<RepoSummary> = match &work.repo_names {
            Some(names) => names.iter().map(|name| RepoSummary { id: 0, name: name.clone() }).collect(),
            None => match &work.owner {
                Owner::Organization(name) => self.upstream.list_org_repos(name).await?,
                Owner::User(name) => self.upstream.list_user_repos(name).await?,
            },
        };

        let mut accepted_names = Vec::new();
        for summary in summaries {
            if !self.filter.allow_repo(&work.owner, &summary.name) {
                continue;
            }
            let repository_id = if work.repo_names.is_none() { Some(summary.id) } else { None };
            accepted_names.push(summary.name.clone());
            self.queue.push(WorkUnit::Repository(RepositoryWork {
                owner: work.owner.name().to_string(),
                repo_name: summary.name,
                repository_id,
            }));
        }

        match &work.owner {
            Owner::Organization(name) => {
                self.store.put_organization(&Organization { name: name.clone(), repository_names: accepted_names })?;
            }
            Owner::User(name) => {
                self.store.put_user_repositories(&UserRepositories { login: name.clone(), repository_names: accepted_names })?;
            }
        }
        Ok(())
    }

    async fn process_repository(&self, work: RepositoryWork) -> Result<(), IngestionError> {
        let issues = self.upstream.list_issues(&work.owner, &work.repo_name).await?;

        let mut first = None;
        let mut last = None;
        for summary in &issues {
            if summary.is_pull_request {
                continue;
            }
            first = Some(first.map_or(summary.number, |f: u64| f.min(summary.number)));
            last = Some(last.map_or(summary.number, |l: u64| l.max(summary.number)));

            if self.filter.allow_issue(&work.owner, &work.repo_name, summary.number) {
                self.queue.push(WorkUnit::Issue(IssueWork {
                    owner: work.owner.clone(),
                    repo_name: work.repo_name.clone(),
                    number: summary.number,
                }));
            }
        }

        let mut repository = hubmirror_core::Repository::new(work.owner.clone(), work.repo_name.clone(), work.repository_id.unwrap_or(0));
        repository.merge_observed_range(first, last);
        self.store.put_repository(&repository)?;
        Ok(())
    }

    async fn process_issue(&self, work: IssueWork) -> Result<(), IngestionError> {
        let mut issue = self.upstream.get_issue(&work.owner, &work.repo_name, work.number).await?;
        if issue.is_pull_request {
            return Ok(());
        }

        issue.comments = self.upstream.list_issue_comments(&work.owner, &work.repo_name, work.number).await?;

        let raw_events = self.upstream.list_issue_event_log(&work.owner, &work.repo_name, work.number).await?;
        issue.issue_events = raw_events
            .into_iter()
            .filter_map(|raw| {
                let kind = IssueEventKind::parse(
                    &raw.kind,
                    raw.assignee_login.as_deref(),
                    raw.assigner_login.as_deref(),
                    raw.label.as_deref(),
                    raw.renamed_from.as_deref(),
                    raw.renamed_to.as_deref(),
                )?;
                Some(IssueEvent {
                    kind,
                    created_at: chrono::DateTime::from_timestamp_millis(raw.created_at_ms as i64).unwrap_or_default(),
                    actor_login: hubmirror_core::resolve_login(raw.actor_login.as_deref()),
                })
            })
            .collect();

        if self.filter.allow_user(&issue.reporter_login) {
            self.queue.push_user(issue.reporter_login.clone(), false);
        }
        for assignee in &issue.assignee_logins {
            if self.filter.allow_user(assignee) {
                self.queue.push_user(assignee.clone(), false);
            }
        }

        let previous = self.store.get_issue(&work.owner, &work.repo_name, work.number)?;
        self.store.put_issue(&issue)?;

        let changed = match &previous {
            Some(previous) => {
                let previous_json = serde_json::to_value(previous).map_err(|err| IngestionError::Invariant(err.to_string()))?;
                let new_json = serde_json::to_value(&issue).map_err(|err| IngestionError::Invariant(err.to_string()))?;
                !canonically_equal(&previous_json, &new_json)
            }
            None => true,
        };

        if changed {
            let event = ResourceChangeEvent::new(self.clock.epoch_ms(), work.owner.clone(), work.repo_name.clone(), work.number);
            self.change_log.append(std::slice::from_ref(&event))?;
        }
        Ok(())
    }

    async fn process_user(&self, work: UserWork) -> Result<(), IngestionError> {
        let user = self.upstream.get_user(&work.login).await?;
        if user.login.is_empty() {
            return Ok(());
        }
        self.store.put_user(&user)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
