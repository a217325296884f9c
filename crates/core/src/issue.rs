// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue, IssueComment, and IssueEvent records.
//!
//! Pull requests are never turned into an [`Issue`] — the worker pool filters
//! them out before a record is ever constructed.

use serde::{Deserialize, Serialize};

/// Sentinel login used whenever an upstream user reference is missing or has
/// a null login. Every user-referencing field on a persisted [`Issue`]
/// resolves to a real login or this literal value — never empty, never null.
pub const GHOST: &str = "Ghost";

/// Resolve an optional upstream login to a real login or [`GHOST`].
pub fn resolve_login(login: Option<&str>) -> String {
    match login {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => GHOST.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The upstream platform's stable internal id, distinct from `number`
    /// (which is only stable within one owner/repo and changes on a move).
    pub id: u64,
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub html_url: String,
    pub reporter_login: String,
    pub assignee_logins: Vec<String>,
    pub labels: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_pull_request: bool,
    pub is_closed: bool,
    pub comments: Vec<IssueComment>,
    pub issue_events: Vec<IssueEvent>,
}

impl Issue {
    /// Deduplicate assignee logins by login, preserving first-seen order —
    /// matching upstream's stated traversal order.
    pub fn dedup_assignees(mut assignees: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        assignees.retain(|login| seen.insert(login.clone()));
        assignees
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub user_login: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A recognized issue-event kind. Kinds not enumerated here are dropped
/// silently by the adapter boundary before ever reaching this type — this is
/// a known, accepted design gap (see the error taxonomy), not a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IssueEventKind {
    #[serde(rename = "assigned")]
    Assigned { assignee: String, assigner: String },
    #[serde(rename = "unassigned")]
    Unassigned { assignee: String, assigner: String },
    #[serde(rename = "labeled")]
    Labeled { label: String },
    #[serde(rename = "unlabeled")]
    Unlabeled { label: String },
    #[serde(rename = "renamed")]
    Renamed { from: String, to: String },
    #[serde(rename = "reopened")]
    Reopened,
    #[serde(rename = "merged")]
    Merged,
    #[serde(rename = "closed")]
    Closed,
}

impl IssueEventKind {
    /// Parse a raw upstream event-kind string plus payload fields into a
    /// recognized kind, or `None` if the kind is not one we track.
    pub fn parse(raw_kind: &str, assignee: Option<&str>, assigner: Option<&str>, label: Option<&str>, from: Option<&str>, to: Option<&str>) -> Option<Self> {
        match raw_kind {
            "assigned" => Some(IssueEventKind::Assigned {
                assignee: resolve_login(assignee),
                assigner: resolve_login(assigner),
            }),
            "unassigned" => Some(IssueEventKind::Unassigned {
                assignee: resolve_login(assignee),
                assigner: resolve_login(assigner),
            }),
            "labeled" => label.map(|l| IssueEventKind::Labeled { label: l.to_string() }),
            "unlabeled" => label.map(|l| IssueEventKind::Unlabeled { label: l.to_string() }),
            "renamed" => match (from, to) {
                (Some(from), Some(to)) => {
                    Some(IssueEventKind::Renamed { from: from.to_string(), to: to.to_string() })
                }
                _ => None,
            },
            "reopened" => Some(IssueEventKind::Reopened),
            "merged" => Some(IssueEventKind::Merged),
            "closed" => Some(IssueEventKind::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    #[serde(flatten)]
    pub kind: IssueEventKind,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub actor_login: String,
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
