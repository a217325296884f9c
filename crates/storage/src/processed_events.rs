// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The processed-events set: a bounded FIFO of activity-event fingerprints,
//! consulted by both the scheduler and the event scanner, so it carries its
//! own monitor rather than sharing the content store's RW lock.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::paths::EVENT_HASHES_PATH;

const CAPACITY: usize = 1000;

struct Inner {
    order: VecDeque<String>,
    members: HashSet<String>,
}

pub struct ProcessedEventsSet {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl ProcessedEventsSet {
    /// Load the set from `<root>/metadata/event-hashes.txt`, if present.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let path = root.join(EVENT_HASHES_PATH);

        let order: VecDeque<String> = match fs::read_to_string(&path) {
            Ok(contents) => contents.lines().filter(|line| !line.is_empty()).map(str::to_string).collect(),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => VecDeque::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let members = order.iter().cloned().collect();

        Ok(Self {
            path,
            inner: Mutex::new(Inner { order, members }),
        })
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.inner.lock().members.contains(fingerprint)
    }

    /// Union the given fingerprints into the set, evicting the oldest
    /// entries FIFO-style once capacity is exceeded, then persist.
    pub fn add_all(&self, fingerprints: impl IntoIterator<Item = String>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        for fingerprint in fingerprints {
            if inner.members.insert(fingerprint.clone()) {
                inner.order.push_back(fingerprint);
            }
        }
        while inner.order.len() > CAPACITY {
            if let Some(evicted) = inner.order.pop_front() {
                inner.members.remove(&evicted);
            }
        }
        self.persist(&inner)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.order.clear();
        inner.members.clear();
        self.persist(&inner)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
        let contents: String = inner.order.iter().map(|fp| format!("{fp}\n")).collect();
        let tmp_path = self.path.with_extension("txt.tmp");
        fs::write(&tmp_path, contents).map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

#[cfg(test)]
#[path = "processed_events_tests.rs"]
mod tests;
