// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's own change-notification record, distinct from an upstream
//! activity-event: emitted whenever a persisted [`crate::Issue`]'s
//! canonicalized form changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChangeEvent {
    pub time_ms: u64,
    pub uuid: uuid::Uuid,
    pub owner_name: String,
    pub repo_name: String,
    pub issue_number: u64,
}

impl ResourceChangeEvent {
    pub fn new(time_ms: u64, owner_name: impl Into<String>, repo_name: impl Into<String>, issue_number: u64) -> Self {
        Self {
            time_ms,
            uuid: uuid::Uuid::new_v4(),
            owner_name: owner_name.into(),
            repo_name: repo_name.into(),
            issue_number,
        }
    }
}

#[cfg(test)]
#[path = "resource_change_event_tests.rs"]
mod tests;
