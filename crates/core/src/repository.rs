// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository records, derived at scan time from the observed non-PR issue range.

use serde::{Deserialize, Serialize};

/// A mirrored repository.
///
/// `last_known_issue` is monotonically non-decreasing across updates from the
/// same scan lineage — the content store enforces this on `put`, not this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub repository_id: u64,
    pub first_known_issue: Option<u64>,
    pub last_known_issue: Option<u64>,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, repository_id: u64) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            repository_id,
            first_known_issue: None,
            last_known_issue: None,
        }
    }

    /// Merge a freshly observed issue range into this record, enforcing the
    /// monotonicity invariant on `last_known_issue`: the higher of the two
    /// values always wins, regardless of which one is "newer".
    pub fn merge_observed_range(&mut self, observed_first: Option<u64>, observed_last: Option<u64>) {
        self.first_known_issue = min_option(self.first_known_issue, observed_first);
        self.last_known_issue = max_option(self.last_known_issue, observed_last);
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn builder(owner: impl Into<String>, name: impl Into<String>) -> RepositoryBuilder {
        RepositoryBuilder {
            owner: owner.into(),
            name: name.into(),
            repository_id: 0,
            first_known_issue: None,
            last_known_issue: None,
        }
    }
}

fn min_option(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn max_option(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct RepositoryBuilder {
    owner: String,
    name: String,
    repository_id: u64,
    first_known_issue: Option<u64>,
    last_known_issue: Option<u64>,
}

#[cfg(any(test, feature = "test-support"))]
impl RepositoryBuilder {
    pub fn repository_id(mut self, id: u64) -> Self {
        self.repository_id = id;
        self
    }

    pub fn range(mut self, first: u64, last: u64) -> Self {
        self.first_known_issue = Some(first);
        self.last_known_issue = Some(last);
        self
    }

    pub fn build(self) -> Repository {
        Repository {
            owner: self.owner,
            name: self.name,
            repository_id: self.repository_id,
            first_known_issue: self.first_known_issue,
            last_known_issue: self.last_known_issue,
        }
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
