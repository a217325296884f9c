// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory inclusion filter applied at each worker processing boundary.
//!
//! A filter may skip any unit, but skipping must never leave an orphan
//! persisted record — callers only ask the filter before doing any writes.

use hubmirror_core::Owner;

pub trait Filter: Send + Sync {
    fn allow_owner(&self, _owner: &Owner) -> bool {
        true
    }

    fn allow_repo(&self, _owner: &Owner, _repo_name: &str) -> bool {
        true
    }

    fn allow_issue(&self, _owner: &str, _repo_name: &str, _issue_number: u64) -> bool {
        true
    }

    fn allow_issue_events(&self, _owner: &str, _repo_name: &str, _issue_number: u64) -> bool {
        true
    }

    fn allow_user(&self, _login: &str) -> bool {
        true
    }
}

/// The default filter: admits everything.
pub struct AllowAll;

impl Filter for AllowAll {}
