// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The boundary trait between the ingestion engine and the upstream
//! code-hosting platform's REST API.

use async_trait::async_trait;
use hubmirror_core::{Issue, IssueComment, User};
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// A repository as listed under an owner, before it has been fetched in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: u64,
    pub name: String,
}

/// An issue as listed within a repository, before it has been fetched in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub is_pull_request: bool,
}

/// The upstream platform's current rate-limit state for this client's
/// credentials, used by the work queue's adaptive pacing gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub remaining: u64,
    pub seconds_to_reset: u64,
    pub total_hourly_limit: u64,
}

/// One entry from a repository's or an issue's activity-event feed, still in
/// its raw upstream shape — fingerprinting and [`hubmirror_core::IssueEventKind`]
/// parsing happen downstream, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivityEvent {
    pub kind: String,
    pub issue_id: u64,
    pub issue_number: u64,
    pub issue_html_url: String,
    pub created_at_ms: u64,
    pub actor_login: Option<String>,
    pub assignee_login: Option<String>,
    pub assigner_login: Option<String>,
    pub label: Option<String>,
    pub renamed_from: Option<String>,
    pub renamed_to: Option<String>,
    pub is_pull_request: bool,
}

/// The full contract the ingestion engine needs from an upstream
/// code-hosting platform. A thin `reqwest`-based implementation is provided
/// for production use; tests depend only on this trait.
#[async_trait]
pub trait UpstreamClient: Send + Sync + 'static {
    async fn list_org_repos(&self, org: &str) -> Result<Vec<RepoSummary>, AdapterError>;

    async fn list_user_repos(&self, user: &str) -> Result<Vec<RepoSummary>, AdapterError>;

    /// List every issue (including pull requests) in state ALL for a repository.
    async fn list_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueSummary>, AdapterError>;

    /// Fetch one issue's own fields, without comments or its event log.
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, AdapterError>;

    async fn list_issue_comments(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<IssueComment>, AdapterError>;

    async fn list_issue_event_log(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<RawActivityEvent>, AdapterError>;

    async fn get_user(&self, login: &str) -> Result<User, AdapterError>;

    /// The owner's platform-hosted repository activity stream.
    async fn list_repo_activity_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError>;

    /// The per-repository issue-events feed, used by the event scanner.
    async fn list_repo_issue_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError>;

    /// `None` when the upstream platform does not report quota for this call shape.
    async fn quota_snapshot(&self) -> Result<Option<QuotaSnapshot>, AdapterError>;
}

#[cfg(test)]
#[path = "upstream_client_tests.rs"]
mod tests;
