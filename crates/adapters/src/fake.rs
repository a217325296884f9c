// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`UpstreamClient`] for engine and scanner tests, grounded on
//! the teacher's `FakeNotifyAdapter` convention: a `parking_lot::Mutex`-held
//! fixture that records nothing beyond what the trait already returns.

use std::collections::HashMap;

use async_trait::async_trait;
use hubmirror_core::{Issue, IssueComment, User};
use parking_lot::Mutex;

use crate::error::AdapterError;
use crate::upstream_client::{IssueSummary, QuotaSnapshot, RawActivityEvent, RepoSummary, UpstreamClient};

#[derive(Default)]
struct Fixture {
    org_repos: HashMap<String, Vec<RepoSummary>>,
    user_repos: HashMap<String, Vec<RepoSummary>>,
    issues: HashMap<(String, String), Vec<IssueSummary>>,
    issue_bodies: HashMap<(String, String, u64), Issue>,
    issue_comments: HashMap<(String, String, u64), Vec<IssueComment>>,
    issue_event_logs: HashMap<(String, String, u64), Vec<RawActivityEvent>>,
    users: HashMap<String, User>,
    repo_activity_events: HashMap<(String, String), Vec<RawActivityEvent>>,
    repo_issue_events: HashMap<(String, String), Vec<RawActivityEvent>>,
    quota: Option<QuotaSnapshot>,
}

/// A hand-populated fake upstream. Every getter returns [`AdapterError::NotFound`]
/// for fixtures that were never seeded, rather than an empty default — tests
/// should seed exactly the data their scenario needs.
#[derive(Clone, Default)]
pub struct FakeUpstreamClient {
    inner: std::sync::Arc<Mutex<Fixture>>,
}

impl FakeUpstreamClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_org_repos(&self, org: &str, repos: Vec<RepoSummary>) {
        self.inner.lock().org_repos.insert(org.to_string(), repos);
    }

    pub fn seed_user_repos(&self, user: &str, repos: Vec<RepoSummary>) {
        self.inner.lock().user_repos.insert(user.to_string(), repos);
    }

    pub fn seed_issues(&self, owner: &str, repo: &str, issues: Vec<IssueSummary>) {
        self.inner.lock().issues.insert((owner.to_string(), repo.to_string()), issues);
    }

    pub fn seed_issue(&self, issue: Issue) {
        let key = (issue.owner.clone(), issue.repo.clone(), issue.number);
        self.inner.lock().issue_bodies.insert(key, issue);
    }

    pub fn seed_issue_comments(&self, owner: &str, repo: &str, number: u64, comments: Vec<IssueComment>) {
        self.inner.lock().issue_comments.insert((owner.to_string(), repo.to_string(), number), comments);
    }

    pub fn seed_issue_event_log(&self, owner: &str, repo: &str, number: u64, events: Vec<RawActivityEvent>) {
        self.inner.lock().issue_event_logs.insert((owner.to_string(), repo.to_string(), number), events);
    }

    pub fn seed_user(&self, user: User) {
        self.inner.lock().users.insert(user.login.clone(), user);
    }

    pub fn seed_repo_activity_events(&self, owner: &str, repo: &str, events: Vec<RawActivityEvent>) {
        self.inner.lock().repo_activity_events.insert((owner.to_string(), repo.to_string()), events);
    }

    pub fn seed_repo_issue_events(&self, owner: &str, repo: &str, events: Vec<RawActivityEvent>) {
        self.inner.lock().repo_issue_events.insert((owner.to_string(), repo.to_string()), events);
    }

    pub fn seed_quota(&self, quota: QuotaSnapshot) {
        self.inner.lock().quota = Some(quota);
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstreamClient {
    async fn list_org_repos(&self, org: &str) -> Result<Vec<RepoSummary>, AdapterError> {
        self.inner.lock().org_repos.get(org).cloned().ok_or_else(|| AdapterError::NotFound(org.to_string()))
    }

    async fn list_user_repos(&self, user: &str) -> Result<Vec<RepoSummary>, AdapterError> {
        self.inner.lock().user_repos.get(user).cloned().ok_or_else(|| AdapterError::NotFound(user.to_string()))
    }

    async fn list_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueSummary>, AdapterError> {
        self.inner
            .lock()
            .issues
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("{owner}/{repo}")))
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, AdapterError> {
        self.inner
            .lock()
            .issue_bodies
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("{owner}/{repo}#{number}")))
    }

    async fn list_issue_comments(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<IssueComment>, AdapterError> {
        Ok(self
            .inner
            .lock()
            .issue_comments
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_issue_event_log(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<RawActivityEvent>, AdapterError> {
        Ok(self
            .inner
            .lock()
            .issue_event_logs
            .get(&(owner.to_string(), repo.to_string(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_user(&self, login: &str) -> Result<User, AdapterError> {
        self.inner.lock().users.get(login).cloned().ok_or_else(|| AdapterError::NotFound(login.to_string()))
    }

    async fn list_repo_activity_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError> {
        Ok(self
            .inner
            .lock()
            .repo_activity_events
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_repo_issue_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError> {
        Ok(self
            .inner
            .lock()
            .repo_issue_events
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn quota_snapshot(&self) -> Result<Option<QuotaSnapshot>, AdapterError> {
        Ok(self.inner.lock().quota)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
