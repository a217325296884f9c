// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User, UserRepositories, and Organization records.

use serde::{Deserialize, Serialize};

/// Immutable within one ingestion cycle; refreshed on full scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub display_name: String,
    pub email: String,
}

/// The ordered list of a user account's repositories, preserving upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserRepositories {
    pub login: String,
    pub repository_names: Vec<String>,
}

/// The ordered list of an organization's repositories, preserving upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Organization {
    pub name: String,
    pub repository_names: Vec<String>,
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
