// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A read-through, write-through cache in front of the content store.
//!
//! The original design holds cached values via weak/soft references so the
//! cache may forget a value at any time; safe stable Rust has no such
//! primitive, so this is modeled as a size-bounded LRU (`lru` crate) behind
//! one lock, matching the teacher's `parking_lot::Mutex`-guarded-map
//! convention. Tests must only assert the read-through/write-through
//! contract, never retention — eviction is allowed to happen at any time.

use std::num::NonZeroUsize;
use std::path::Path;

use hubmirror_core::{Issue, Organization, Repository, User, UserRepositories};
use hubmirror_storage::{ContentStore, StoreError};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};

pub struct CachingStore {
    store: ContentStore,
    entries: Mutex<LruCache<String, serde_json::Value>>,
}

impl CachingStore {
    pub fn new(root: impl Into<std::path::PathBuf>, capacity: NonZeroUsize) -> Self {
        Self {
            store: ContentStore::new(root),
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    fn cached_get<T, F>(&self, key: String, fetch: F) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Serialize + Clone,
        F: FnOnce() -> Result<Option<T>, StoreError>,
    {
        if let Some(cached) = self.entries.lock().get(&key).cloned() {
            return Ok(serde_json::from_value(cached).ok());
        }

        let fetched = fetch()?;
        if let Some(value) = &fetched {
            let json = serde_json::to_value(value).map_err(|source| StoreError::Serialization { path: key.clone().into(), source })?;
            self.entries.lock().put(key, json);
        }
        Ok(fetched)
    }

    fn cached_put<T, F>(&self, key: String, value: &T, write: F) -> Result<(), StoreError>
    where
        T: Serialize,
        F: FnOnce() -> Result<(), StoreError>,
    {
        write()?;
        let json = serde_json::to_value(value).map_err(|source| StoreError::Serialization { path: key.clone().into(), source })?;
        self.entries.lock().put(key, json);
        Ok(())
    }

    pub fn get_repository(&self, owner: &str, name: &str) -> Result<Option<Repository>, StoreError> {
        self.cached_get(format!("repository:{owner}/{name}"), || self.store.get_repository(owner, name))
    }

    pub fn put_repository(&self, repository: &Repository) -> Result<(), StoreError> {
        let key = format!("repository:{}/{}", repository.owner, repository.name);
        self.cached_put(key.clone(), repository, || self.store.put_repository(repository))?;
        // The store may have merged against a previously-persisted range;
        // re-read so the cache reflects the merged value, not the caller's.
        if let Some(merged) = self.store.get_repository(&repository.owner, &repository.name)? {
            let json = serde_json::to_value(&merged).map_err(|source| StoreError::Serialization { path: key.clone().into(), source })?;
            self.entries.lock().put(key, json);
        }
        Ok(())
    }

    pub fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Option<Issue>, StoreError> {
        self.cached_get(format!("issue:{owner}/{repo}/{number}"), || self.store.get_issue(owner, repo, number))
    }

    pub fn put_issue(&self, issue: &Issue) -> Result<(), StoreError> {
        let key = format!("issue:{}/{}/{}", issue.owner, issue.repo, issue.number);
        self.cached_put(key, issue, || self.store.put_issue(issue))
    }

    pub fn get_organization(&self, name: &str) -> Result<Option<Organization>, StoreError> {
        self.cached_get(format!("organization:{name}"), || self.store.get_organization(name))
    }

    pub fn put_organization(&self, organization: &Organization) -> Result<(), StoreError> {
        let key = format!("organization:{}", organization.name);
        self.cached_put(key, organization, || self.store.put_organization(organization))
    }

    pub fn get_user_repositories(&self, name: &str) -> Result<Option<UserRepositories>, StoreError> {
        self.cached_get(format!("user_repositories:{name}"), || self.store.get_user_repositories(name))
    }

    pub fn put_user_repositories(&self, user_repositories: &UserRepositories) -> Result<(), StoreError> {
        let key = format!("user_repositories:{}", user_repositories.login);
        self.cached_put(key, user_repositories, || self.store.put_user_repositories(user_repositories))
    }

    pub fn get_user(&self, login: &str) -> Result<Option<User>, StoreError> {
        self.cached_get(format!("user:{login}"), || self.store.get_user(login))
    }

    pub fn put_user(&self, user: &User) -> Result<(), StoreError> {
        let key = format!("user:{}", user.login);
        self.cached_put(key, user, || self.store.put_user(user))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
