// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The content store: a content-addressed, file-backed JSON document store.
//!
//! Reads are concurrent; writes are serialized behind one read-write lock per
//! store instance, matching the teacher's single-writer-many-readers
//! convention. Every write goes through a temp-file-then-rename so a reader
//! never observes a torn write.

use std::fs;
use std::path::{Path, PathBuf};

use hubmirror_core::{EngineConfig, Issue, Organization, Repository, User, UserRepositories};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::paths::{scalar_key_path, StoreKey, OLD_DIR};

const INITIALIZED_KEY: &str = "initialized";
const CONTENTS_HASH_KEY: &str = "githubContentsHash";

/// File-backed content store rooted at a single directory on disk.
pub struct ContentStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn abs(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    fn read_json<T: DeserializeOwned>(&self, rel: impl AsRef<Path>) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.read();
        let path = self.abs(&rel);
        match fs::read(&path) {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization { path: path.clone(), source })?;
                Ok(Some(value))
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write_json<T: Serialize>(&self, rel: impl AsRef<Path>, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        let path = self.abs(&rel);
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization { path: path.clone(), source })?;
        self.atomic_write(&path, &bytes)
    }

    fn atomic_write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
        let tmp_path = path.with_extension(match path.extension() {
            Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
            None => "tmp".to_string(),
        });
        fs::write(&tmp_path, bytes).map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
        fs::rename(&tmp_path, path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        Ok(())
    }

    // -- Typed documents --

    pub fn get_repository(&self, owner: &str, repo: &str) -> Result<Option<Repository>, StoreError> {
        self.read_json(StoreKey::Repository { owner, repo }.relative_path())
    }

    /// Persist a repository record. If one is already stored, the observed
    /// range is merged rather than overwritten: `last_known_issue` never
    /// regresses.
    pub fn put_repository(&self, repository: &Repository) -> Result<(), StoreError> {
        let key = StoreKey::Repository {
            owner: &repository.owner,
            repo: &repository.name,
        };
        let merged = match self.get_repository(&repository.owner, &repository.name)? {
            Some(mut existing) => {
                existing.merge_observed_range(repository.first_known_issue, repository.last_known_issue);
                existing.repository_id = repository.repository_id;
                existing
            }
            None => repository.clone(),
        };
        self.write_json(key.relative_path(), &merged)
    }

    pub fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Option<Issue>, StoreError> {
        self.read_json(StoreKey::Issue { owner, repo, number }.relative_path())
    }

    pub fn put_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        let key = StoreKey::Issue {
            owner: &issue.owner,
            repo: &issue.repo,
            number: issue.number,
        };
        self.write_json(key.relative_path(), issue)
    }

    pub fn get_organization(&self, name: &str) -> Result<Option<Organization>, StoreError> {
        self.read_json(StoreKey::Organization { name }.relative_path())
    }

    pub fn put_organization(&self, organization: &Organization) -> Result<(), StoreError> {
        let key = StoreKey::Organization { name: &organization.name };
        self.write_json(key.relative_path(), organization)
    }

    pub fn get_user_repositories(&self, name: &str) -> Result<Option<UserRepositories>, StoreError> {
        self.read_json(StoreKey::UserRepositories { name }.relative_path())
    }

    pub fn put_user_repositories(&self, user_repositories: &UserRepositories) -> Result<(), StoreError> {
        let key = StoreKey::UserRepositories { name: &user_repositories.login };
        self.write_json(key.relative_path(), user_repositories)
    }

    pub fn get_user(&self, login: &str) -> Result<Option<User>, StoreError> {
        self.read_json(StoreKey::User { login }.relative_path())
    }

    pub fn put_user(&self, user: &User) -> Result<(), StoreError> {
        let key = StoreKey::User { login: &user.login };
        self.write_json(key.relative_path(), user)
    }

    // -- Small named scalars --

    pub fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.read();
        let path = self.abs(scalar_key_path(key));
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        let path = self.abs(scalar_key_path(key));
        self.atomic_write(&path, value.as_bytes())
    }

    pub fn get_long(&self, key: &str) -> Result<Option<i64>, StoreError> {
        match self.get_string(key)? {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| StoreError::Invariant(format!("scalar key {key} does not hold an integer"))),
            None => Ok(None),
        }
    }

    pub fn put_long(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.put_string(key, &value.to_string())
    }

    // -- Lifecycle --

    pub fn is_initialized(&self) -> Result<bool, StoreError> {
        Ok(self.get_string(INITIALIZED_KEY)?.is_some())
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.put_string(INITIALIZED_KEY, "true")
    }

    /// Compare the configured targets' content-hash against the stored one.
    /// Returns `true` if drift was detected and the store was quarantined
    /// into `old/`, `false` if the store matches (or was freshly seeded).
    pub fn reconcile_against_config(&self, config: &EngineConfig, now_epoch_ms: u64) -> Result<bool, StoreError> {
        let hash = config_content_hash(config);

        if !self.is_initialized()? {
            self.put_string(CONTENTS_HASH_KEY, &hash)?;
            return Ok(false);
        }

        let stored_hash = self.get_string(CONTENTS_HASH_KEY)?;
        if stored_hash.as_deref() == Some(hash.as_str()) {
            return Ok(false);
        }

        self.quarantine_existing_contents(now_epoch_ms)?;
        self.put_string(CONTENTS_HASH_KEY, &hash)?;
        Ok(true)
    }

    fn quarantine_existing_contents(&self, now_epoch_ms: u64) -> Result<(), StoreError> {
        let _guard = self.lock.write();
        fs::create_dir_all(self.root.join(OLD_DIR)).map_err(|source| StoreError::Io {
            path: self.root.join(OLD_DIR),
            source,
        })?;

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(StoreError::Io { path: self.root.clone(), source }),
        };

        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io { path: self.root.clone(), source })?;
            let name = entry.file_name();
            if name == OLD_DIR {
                continue;
            }
            let from = entry.path();
            let to = self.root.join(OLD_DIR).join(format!("{}.old.{now_epoch_ms}", name.to_string_lossy()));
            tracing::info!(from = %from.display(), to = %to.display(), "quarantining store contents after config drift");
            fs::rename(&from, &to).map_err(|source| StoreError::Io { path: from, source })?;
        }
        Ok(())
    }
}

/// Deterministic hash of the configured owner/individual-repo targets, used
/// to detect configuration drift between runs. Per the lowercased, sorted
/// concatenation rule, each framed part is lowercased before sorting so a
/// case-only config change is never mistaken for drift.
fn config_content_hash(config: &EngineConfig) -> String {
    let mut parts: Vec<String> = config
        .owner_targets
        .iter()
        .map(|target| format!("owner:{}", target.owner).to_lowercase())
        .chain(
            config
                .individual_repos
                .iter()
                .map(|repo| format!("repo:{}:{}", repo.owner, repo.repo_name).to_lowercase()),
        )
        .collect();
    parts.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(parts.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "content_store_tests.rs"]
mod tests;
