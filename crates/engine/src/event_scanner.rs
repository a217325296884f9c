// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event scanner: walks an owner's upstream activity feeds to decide
//! whether the issues that changed recently can be caught up individually, or
//! whether a full scan is unavoidable.

use std::collections::HashSet;
use std::sync::Arc;

use hubmirror_adapters::{RawActivityEvent, UpstreamClient};
use hubmirror_core::{fingerprint, resolve_login, ActivityEventKind, Clock, FingerprintInput, IngestionError, Owner};
use hubmirror_storage::ProcessedEventsSet;

use crate::error::ScanError;
use crate::filter::Filter;
use crate::heartbeat::ProgressHandle;
use crate::queue::{IssueWork, WorkKind, WorkQueue, WorkUnit};

const STREAK_BAILOUT: u32 = 20;
const PACE_EVERY: u32 = 20;
const IGNORED_ISSUE_EVENT_KINDS: &[&str] = &["subscribed", "mentioned"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub full_scan_required: bool,
    pub fingerprints: Vec<String>,
}

#[derive(Clone, Copy)]
enum FeedKind {
    RepoActivity,
    IssueEvents,
}

struct ScanEntry {
    repo: String,
    issue_number: u64,
    issue_id: u64,
}

struct ScanState {
    full_scan_required: bool,
    streak: u32,
    events_seen: u32,
    fingerprints: Vec<String>,
    entries: Vec<ScanEntry>,
    entry_keys: HashSet<(String, u64)>,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            full_scan_required: true,
            streak: 0,
            events_seen: 0,
            fingerprints: Vec::new(),
            entries: Vec::new(),
            entry_keys: HashSet::new(),
        }
    }
}

/// Maps a raw feed event kind string to the fingerprinted kind it
/// represents, or `None` if it is unrecognized or explicitly ignored.
fn classify(feed: FeedKind, raw_kind: &str) -> Option<ActivityEventKind> {
    match feed {
        FeedKind::RepoActivity => match raw_kind {
            "commented" => Some(ActivityEventKind::IssueCommented),
            "modified" => Some(ActivityEventKind::IssueModified),
            _ => None,
        },
        FeedKind::IssueEvents => {
            if IGNORED_ISSUE_EVENT_KINDS.contains(&raw_kind) {
                return None;
            }
            match raw_kind {
                "assigned" => Some(ActivityEventKind::Assigned),
                "unassigned" => Some(ActivityEventKind::Unassigned),
                "labeled" => Some(ActivityEventKind::Labeled),
                "unlabeled" => Some(ActivityEventKind::Unlabeled),
                "renamed" => Some(ActivityEventKind::Renamed),
                "reopened" => Some(ActivityEventKind::Reopened),
                "merged" => Some(ActivityEventKind::Merged),
                "closed" => Some(ActivityEventKind::Closed),
                _ => None,
            }
        }
    }
}

/// Parse `.../<owner>/<repo>/issues/<number>` from an issue's html url.
fn parse_issue_url(url: &str) -> Option<(String, String, u64)> {
    let segments: Vec<&str> = url.trim_end_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    let n = segments.len();
    if n < 4 {
        return None;
    }
    let number: u64 = segments[n - 1].parse().ok()?;
    if segments[n - 2] != "issues" {
        return None;
    }
    let repo = segments[n - 3].to_string();
    let owner = segments[n - 4].to_string();
    Some((owner, repo, number))
}

/// Inspects an owner's repository-activity and issue-events feeds and
/// produces the set of issues to refetch, without itself persisting
/// anything — the caller decides when and whether to commit the newly-seen
/// fingerprints and to enqueue the resulting issue units.
pub struct EventScanner<C: Clock> {
    upstream: Arc<dyn UpstreamClient>,
    processed: Arc<ProcessedEventsSet>,
    queue: Arc<WorkQueue<C>>,
    filter: Arc<dyn Filter>,
}

impl<C: Clock + 'static> EventScanner<C> {
    pub fn new(upstream: Arc<dyn UpstreamClient>, processed: Arc<ProcessedEventsSet>, queue: Arc<WorkQueue<C>>, filter: Arc<dyn Filter>) -> Self {
        Self { upstream, processed, queue, filter }
    }

    /// Scan one owner's configured repositories. `last_full_scan_start_ms` is
    /// `None` when the store has never completed a full scan. `progress` is
    /// pinged around every upstream call, so the heartbeat runner guarding
    /// this scan can tell a slow-but-alive scan from a genuinely stalled one.
    pub async fn scan_owner(&self, owner: &Owner, repo_names: &[String], last_full_scan_start_ms: Option<u64>, progress: &ProgressHandle) -> Result<ScanResult, IngestionError> {
        let mut state = ScanState::default();

        'feeds: {
            for repo in repo_names {
                progress.ping();
                match self.upstream.list_repo_activity_events(owner.name(), repo).await {
                    Ok(events) => {
                        if self.consume_feed(owner, repo, events, FeedKind::RepoActivity, last_full_scan_start_ms, &mut state) {
                            break 'feeds;
                        }
                    }
                    Err(err) => tracing::warn!(owner = %owner, repo, error = %err, "repository activity feed fetch failed, skipping"),
                }
            }
            for repo in repo_names {
                progress.ping();
                match self.upstream.list_repo_issue_events(owner.name(), repo).await {
                    Ok(events) => {
                        if self.consume_feed(owner, repo, events, FeedKind::IssueEvents, last_full_scan_start_ms, &mut state) {
                            break 'feeds;
                        }
                    }
                    Err(err) => tracing::warn!(owner = %owner, repo, error = %err, "issue events feed fetch failed, skipping"),
                }
            }
        }

        // Newly-seen fingerprints are knowledge regardless of what happens
        // next: persist them before the fallible resolve step, so a
        // cross-owner-move abort still commits everything else this pass
        // learned about the feed.
        self.processed.add_all(state.fingerprints.clone())?;

        if !state.full_scan_required {
            self.resolve_and_enqueue(owner, &state.entries, progress).await?;
        }

        Ok(ScanResult { full_scan_required: state.full_scan_required, fingerprints: state.fingerprints })
    }

    /// Consume one feed's events into `state`. Returns `true` if a bailout
    /// fired and the caller should stop consuming any further feed.
    fn consume_feed(&self, owner: &Owner, repo: &str, events: Vec<RawActivityEvent>, feed: FeedKind, last_full_scan_start_ms: Option<u64>, state: &mut ScanState) -> bool {
        for raw in events {
            if raw.is_pull_request {
                continue;
            }
            let Some(kind) = classify(feed, &raw.kind) else { continue };
            let actor = resolve_login(raw.actor_login.as_deref());
            let input = FingerprintInput {
                kind,
                org_name: owner.is_organization().then(|| owner.name()),
                user_name: (!owner.is_organization()).then(|| owner.name()),
                repo_name: repo,
                issue_number: raw.issue_number,
                created_at_millis: raw.created_at_ms,
                actor_login: &actor,
            };
            let fp = fingerprint(&input);
            state.fingerprints.push(fp.clone());
            state.events_seen += 1;
            if state.events_seen % PACE_EVERY == 0 {
                self.queue.wait_if_needed(WorkKind::Issue, 1);
            }

            if self.processed.contains(&fp) {
                state.streak += 1;
                if state.streak >= STREAK_BAILOUT {
                    state.full_scan_required = false;
                    return true;
                }
            } else {
                state.streak = 0;
                let key = (repo.to_string(), raw.issue_number);
                if state.entry_keys.insert(key) {
                    state.entries.push(ScanEntry { repo: repo.to_string(), issue_number: raw.issue_number, issue_id: raw.issue_id });
                }
            }

            if let Some(last_full) = last_full_scan_start_ms {
                if raw.created_at_ms < last_full {
                    state.full_scan_required = false;
                    return true;
                }
            }
        }
        false
    }

    /// Refetch and enqueue every still-current scan entry, handling the
    /// redirect-on-move case. Bails out entirely on a cross-owner move.
    async fn resolve_and_enqueue(&self, owner: &Owner, entries: &[ScanEntry], progress: &ProgressHandle) -> Result<(), IngestionError> {
        for entry in entries {
            progress.ping();
            let fetched = match self.upstream.get_issue(owner.name(), &entry.repo, entry.issue_number).await {
                Ok(issue) => issue,
                Err(err) => {
                    tracing::warn!(owner = %owner, repo = %entry.repo, number = entry.issue_number, error = %err, "issue resolve failed, skipping");
                    continue;
                }
            };

            let (final_owner, final_repo, final_number) = if fetched.id == entry.issue_id {
                (owner.name().to_string(), entry.repo.clone(), entry.issue_number)
            } else {
                let Some((new_owner, new_repo, new_number)) = parse_issue_url(&fetched.html_url) else {
                    tracing::warn!(url = %fetched.html_url, "moved issue's url did not parse, skipping");
                    continue;
                };
                if new_owner != owner.name() {
                    return Err(ScanError::CrossOwnerMove { repo: entry.repo.clone(), from_owner: owner.name().to_string(), to_owner: new_owner }.into());
                }
                (new_owner, new_repo, new_number)
            };

            if !self.filter.allow_issue(&final_owner, &final_repo, final_number) {
                continue;
            }
            self.queue.push(WorkUnit::Issue(IssueWork { owner: final_owner, repo_name: final_repo, number: final_number }));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "event_scanner_tests.rs"]
mod tests;
