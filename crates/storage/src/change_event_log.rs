// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only log of [`ResourceChangeEvent`]s, grouped into one file per
//! distinct (timestamp-collision-resolved) write, with an 8-day retention
//! window enforced opportunistically on read.

use std::fs;
use std::path::PathBuf;

use hubmirror_core::ResourceChangeEvent;
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::paths::EVENTS_DIR;

const RETENTION_MS: u64 = 8 * 24 * 60 * 60 * 1000;

pub struct ChangeEventLog {
    root: PathBuf,
    lock: Mutex<()>,
}

impl ChangeEventLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    fn dir(&self) -> PathBuf {
        self.root.join(EVENTS_DIR)
    }

    /// Append a batch of change events as one file named by the first
    /// event's timestamp, walking the millisecond forward past any existing
    /// file until an unused name is found.
    pub fn append(&self, events: &[ResourceChangeEvent]) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock();

        let dir = self.dir();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;

        let mut ms = events[0].time_ms;
        let path = loop {
            let candidate = dir.join(format!("issue-{ms}.json"));
            if !candidate.exists() {
                break candidate;
            }
            ms += 1;
        };

        let bytes = serde_json::to_vec_pretty(events).map_err(|source| StoreError::Serialization { path: path.clone(), source })?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes).map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io { path, source })?;
        Ok(())
    }

    /// Return every event with `time_ms >= since_ms`, ascending by time.
    /// As a side effect, delete files whose filename timestamp is older
    /// than the retention window; failures to delete are ignored.
    pub fn recent_since(&self, since_ms: u64, now_ms: u64) -> Result<Vec<ResourceChangeEvent>, StoreError> {
        let _guard = self.lock.lock();

        let dir = self.dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut collected = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io { path: dir.clone(), source })?;
            let path = entry.path();
            let Some(file_ms) = file_timestamp(&path) else { continue };

            if now_ms.saturating_sub(file_ms) > RETENTION_MS {
                let _ = fs::remove_file(&path);
                continue;
            }

            let bytes = fs::read(&path).map_err(|source| StoreError::Io { path: path.clone(), source })?;
            let events: Vec<ResourceChangeEvent> =
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization { path: path.clone(), source })?;
            collected.extend(events.into_iter().filter(|event| event.time_ms >= since_ms));
        }

        collected.sort_by_key(|event| event.time_ms);
        Ok(collected)
    }
}

fn file_timestamp(path: &std::path::Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("issue-")?.parse().ok()
}

#[cfg(test)]
#[path = "change_event_log_tests.rs"]
mod tests;
