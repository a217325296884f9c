// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-to-relative-path mapping for the on-disk content store layout.

use std::path::PathBuf;

/// A typed key into the content store, mirroring the on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKey<'a> {
    Repository { owner: &'a str, repo: &'a str },
    Issue { owner: &'a str, repo: &'a str, number: u64 },
    Organization { name: &'a str },
    UserRepositories { name: &'a str },
    User { login: &'a str },
}

impl StoreKey<'_> {
    /// Path of this key's JSON document, relative to the store root.
    pub fn relative_path(&self) -> PathBuf {
        match self {
            StoreKey::Repository { owner, repo } => PathBuf::from(owner).join(repo).join(format!("{repo}.json")),
            StoreKey::Issue { owner, repo, number } => PathBuf::from(owner).join(repo).join(format!("{number}.json")),
            StoreKey::Organization { name } => PathBuf::from(name).join(format!("{name}.json")),
            StoreKey::UserRepositories { name } => PathBuf::from(name).join(format!("{name}.json")),
            StoreKey::User { login } => PathBuf::from("users").join(format!("{login}.json")),
        }
    }
}

pub fn scalar_key_path(key: &str) -> PathBuf {
    PathBuf::from("keys").join(format!("{key}.txt"))
}

pub const EVENT_HASHES_PATH: &str = "metadata/event-hashes.txt";
pub const EVENTS_DIR: &str = "events";
pub const OLD_DIR: &str = "old";

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
