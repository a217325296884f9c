// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal `reqwest`-based [`UpstreamClient`].
//!
//! This deliberately does not paginate past a single page, does not retry,
//! and does not cache — a production-grade client with those concerns is the
//! excluded collaborator's job. It exists so the workspace is runnable
//! end to end against a real upstream.

use async_trait::async_trait;
use hubmirror_core::{Issue, IssueComment, User};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::AdapterError;
use crate::upstream_client::{IssueSummary, QuotaSnapshot, RawActivityEvent, RepoSummary, UpstreamClient};

pub struct GithubUpstreamClient {
    http: Client,
    base_url: String,
    username: String,
    token: String,
}

impl GithubUpstreamClient {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            username: username.into(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, AdapterError> {
        let response = self
            .http
            .get(self.url(path))
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await
            .map_err(|err| AdapterError::Transient(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AdapterError::NotFound(path.to_string())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => return Err(AdapterError::QuotaExhausted),
            status if status.is_server_error() => return Err(AdapterError::Transient(format!("{status} from {path}"))),
            status if !status.is_success() => return Err(AdapterError::MalformedResponse(format!("{status} from {path}"))),
            _ => {}
        }

        response.json().await.map_err(|err| AdapterError::MalformedResponse(err.to_string()))
    }
}

#[derive(Deserialize)]
struct RawRepo {
    id: u64,
    name: String,
}

#[async_trait]
impl UpstreamClient for GithubUpstreamClient {
    async fn list_org_repos(&self, org: &str) -> Result<Vec<RepoSummary>, AdapterError> {
        let repos: Vec<RawRepo> = self.get_json(&format!("/orgs/{org}/repos")).await?;
        Ok(repos.into_iter().map(|r| RepoSummary { id: r.id, name: r.name }).collect())
    }

    async fn list_user_repos(&self, user: &str) -> Result<Vec<RepoSummary>, AdapterError> {
        let repos: Vec<RawRepo> = self.get_json(&format!("/users/{user}/repos")).await?;
        Ok(repos.into_iter().map(|r| RepoSummary { id: r.id, name: r.name }).collect())
    }

    async fn list_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueSummary>, AdapterError> {
        #[derive(Deserialize)]
        struct RawIssueSummary {
            number: u64,
            #[serde(default)]
            pull_request: Option<serde_json::Value>,
        }
        let issues: Vec<RawIssueSummary> = self.get_json(&format!("/repos/{owner}/{repo}/issues?state=all")).await?;
        Ok(issues
            .into_iter()
            .map(|i| IssueSummary { number: i.number, is_pull_request: i.pull_request.is_some() })
            .collect())
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue, AdapterError> {
        #[derive(Deserialize)]
        struct RawUserRef {
            login: Option<String>,
        }
        #[derive(Deserialize)]
        struct RawLabel {
            name: String,
        }
        #[derive(Deserialize)]
        struct RawIssueBody {
            id: u64,
            number: u64,
            title: String,
            #[serde(default)]
            body: Option<String>,
            html_url: String,
            user: Option<RawUserRef>,
            #[serde(default)]
            assignees: Vec<RawUserRef>,
            #[serde(default)]
            labels: Vec<RawLabel>,
            created_at: chrono::DateTime<chrono::Utc>,
            closed_at: Option<chrono::DateTime<chrono::Utc>>,
            #[serde(default)]
            pull_request: Option<serde_json::Value>,
            state: String,
        }

        let raw: RawIssueBody = self.get_json(&format!("/repos/{owner}/{repo}/issues/{number}")).await?;
        Ok(Issue {
            id: raw.id,
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: raw.number,
            title: raw.title,
            body: raw.body.unwrap_or_default(),
            html_url: raw.html_url,
            reporter_login: hubmirror_core::resolve_login(raw.user.and_then(|u| u.login).as_deref()),
            assignee_logins: hubmirror_core::Issue::dedup_assignees(
                raw.assignees.into_iter().map(|a| hubmirror_core::resolve_login(a.login.as_deref())).collect(),
            ),
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            created_at: raw.created_at,
            closed_at: raw.closed_at,
            is_pull_request: raw.pull_request.is_some(),
            is_closed: raw.state == "closed",
            comments: Vec::new(),
            issue_events: Vec::new(),
        })
    }

    async fn list_issue_comments(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<IssueComment>, AdapterError> {
        #[derive(Deserialize)]
        struct RawComment {
            user: Option<RawUserRef>,
            body: Option<String>,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }
        #[derive(Deserialize)]
        struct RawUserRef {
            login: Option<String>,
        }

        let raw: Vec<RawComment> = self.get_json(&format!("/repos/{owner}/{repo}/issues/{number}/comments")).await?;
        Ok(raw
            .into_iter()
            .map(|c| IssueComment {
                user_login: hubmirror_core::resolve_login(c.user.and_then(|u| u.login).as_deref()),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn list_issue_event_log(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<RawActivityEvent>, AdapterError> {
        self.fetch_events(&format!("/repos/{owner}/{repo}/issues/{number}/events"), owner).await
    }

    async fn get_user(&self, login: &str) -> Result<User, AdapterError> {
        #[derive(Deserialize)]
        struct RawUser {
            login: String,
            name: Option<String>,
            email: Option<String>,
        }
        let raw: RawUser = self.get_json(&format!("/users/{login}")).await?;
        Ok(User {
            login: raw.login,
            display_name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
        })
    }

    async fn list_repo_activity_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError> {
        self.fetch_events(&format!("/repos/{owner}/{repo}/events"), owner).await
    }

    async fn list_repo_issue_events(&self, owner: &str, repo: &str) -> Result<Vec<RawActivityEvent>, AdapterError> {
        self.fetch_events(&format!("/repos/{owner}/{repo}/issues/events"), owner).await
    }

    async fn quota_snapshot(&self) -> Result<Option<QuotaSnapshot>, AdapterError> {
        #[derive(Deserialize)]
        struct RawRateLimit {
            resources: RawCoreLimit,
        }
        #[derive(Deserialize)]
        struct RawCoreLimit {
            core: RawCore,
        }
        #[derive(Deserialize)]
        struct RawCore {
            remaining: u64,
            reset: u64,
            limit: u64,
        }

        let raw: RawRateLimit = self.get_json("/rate_limit").await?;
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        Ok(Some(QuotaSnapshot {
            remaining: raw.resources.core.remaining,
            seconds_to_reset: raw.resources.core.reset.saturating_sub(now),
            total_hourly_limit: raw.resources.core.limit,
        }))
    }
}

impl GithubUpstreamClient {
    async fn fetch_events(&self, path: &str, _owner: &str) -> Result<Vec<RawActivityEvent>, AdapterError> {
        #[derive(Deserialize)]
        struct RawEvent {
            event: String,
            actor: Option<RawActor>,
            assignee: Option<RawActor>,
            assigner: Option<RawActor>,
            label: Option<RawLabelRef>,
            rename: Option<RawRename>,
            created_at: chrono::DateTime<chrono::Utc>,
            issue: Option<RawIssueRef>,
        }
        #[derive(Deserialize)]
        struct RawActor {
            login: Option<String>,
        }
        #[derive(Deserialize)]
        struct RawLabelRef {
            name: String,
        }
        #[derive(Deserialize)]
        struct RawRename {
            from: String,
            to: String,
        }
        #[derive(Deserialize)]
        struct RawIssueRef {
            id: u64,
            number: u64,
            html_url: String,
            #[serde(default)]
            pull_request: Option<serde_json::Value>,
        }

        let raw: Vec<RawEvent> = self.get_json(path).await?;
        Ok(raw
            .into_iter()
            .filter_map(|e| {
                let issue = e.issue?;
                Some(RawActivityEvent {
                    kind: e.event,
                    issue_id: issue.id,
                    issue_number: issue.number,
                    issue_html_url: issue.html_url,
                    created_at_ms: e.created_at.timestamp_millis().max(0) as u64,
                    actor_login: e.actor.and_then(|a| a.login),
                    assignee_login: e.assignee.and_then(|a| a.login),
                    assigner_login: e.assigner.and_then(|a| a.login),
                    label: e.label.map(|l| l.name),
                    renamed_from: e.rename.as_ref().map(|r| r.from.clone()),
                    renamed_to: e.rename.map(|r| r.to),
                    is_pull_request: issue.pull_request.is_some(),
                })
            })
            .collect())
    }
}
