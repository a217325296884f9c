// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity-event fingerprinting for deduplication.
//!
//! A fingerprint is never rendered to users — it exists purely so the
//! processed-events set and the event scanner can recognize "this exact
//! upstream activity event has already been accounted for".

use sha2::{Digest, Sha256};

/// The upstream activity-event kinds the scanner fingerprints.
///
/// The ordinal (declaration order) feeds directly into the fingerprint, so
/// reordering this enum would silently change every previously-computed
/// fingerprint — treat it as append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEventKind {
    IssueCommented,
    IssueModified,
    Assigned,
    Unassigned,
    Labeled,
    Unlabeled,
    Renamed,
    Reopened,
    Merged,
    Closed,
}

impl ActivityEventKind {
    fn ordinal(self) -> u8 {
        match self {
            ActivityEventKind::IssueCommented => 0,
            ActivityEventKind::IssueModified => 1,
            ActivityEventKind::Assigned => 2,
            ActivityEventKind::Unassigned => 3,
            ActivityEventKind::Labeled => 4,
            ActivityEventKind::Unlabeled => 5,
            ActivityEventKind::Renamed => 6,
            ActivityEventKind::Reopened => 7,
            ActivityEventKind::Merged => 8,
            ActivityEventKind::Closed => 9,
        }
    }
}

/// The fields an activity event contributes to its fingerprint.
pub struct FingerprintInput<'a> {
    pub kind: ActivityEventKind,
    pub org_name: Option<&'a str>,
    pub user_name: Option<&'a str>,
    pub repo_name: &'a str,
    pub issue_number: u64,
    pub created_at_millis: u64,
    pub actor_login: &'a str,
}

const NULL: &str = "null";

/// Compute the SHA-256 fingerprint: `ordinal(kind) | orgName? | userName? |
/// repoName | issueNumber | createdAtMillis | actorLogin`, joined by `-`.
/// Nullable fields contribute the literal `null`.
pub fn fingerprint(input: &FingerprintInput<'_>) -> String {
    let parts = [
        input.kind.ordinal().to_string(),
        input.org_name.unwrap_or(NULL).to_string(),
        input.user_name.unwrap_or(NULL).to_string(),
        input.repo_name.to_string(),
        input.issue_number.to_string(),
        input.created_at_millis.to_string(),
        input.actor_login.to_string(),
    ];
    let joined = parts.join("-");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
