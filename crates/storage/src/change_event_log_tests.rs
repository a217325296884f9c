// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hubmirror_core::ResourceChangeEvent;
use tempfile::tempdir;

fn event(time_ms: u64, issue_number: u64) -> ResourceChangeEvent {
    ResourceChangeEvent::new(time_ms, "eclipse", "microclimate-vscode-tools", issue_number)
}

#[test]
fn append_then_recent_since_returns_ascending_by_time() {
    let dir = tempdir().unwrap();
    let log = ChangeEventLog::new(dir.path());

    log.append(&[event(2_000, 2)]).unwrap();
    log.append(&[event(1_000, 1)]).unwrap();

    let events = log.recent_since(0, 10_000).unwrap();
    assert_eq!(events.iter().map(|e| e.time_ms).collect::<Vec<_>>(), vec![1_000, 2_000]);
}

#[test]
fn recent_since_excludes_events_before_the_cutoff() {
    let dir = tempdir().unwrap();
    let log = ChangeEventLog::new(dir.path());
    log.append(&[event(1_000, 1), event(5_000, 2)]).unwrap();

    let events = log.recent_since(3_000, 10_000).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time_ms, 5_000);
}

#[test]
fn timestamp_collisions_increment_past_existing_files() {
    let dir = tempdir().unwrap();
    let log = ChangeEventLog::new(dir.path());

    log.append(&[event(1_000, 1)]).unwrap();
    log.append(&[event(1_000, 2)]).unwrap();

    assert!(dir.path().join("events/issue-1000.json").is_file());
    assert!(dir.path().join("events/issue-1001.json").is_file());

    let events = log.recent_since(0, 10_000).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn files_older_than_retention_window_are_garbage_collected_on_read() {
    let dir = tempdir().unwrap();
    let log = ChangeEventLog::new(dir.path());
    let nine_days_ms = 9 * 24 * 60 * 60 * 1000;
    log.append(&[event(0, 1)]).unwrap();

    let events = log.recent_since(0, nine_days_ms).unwrap();
    assert!(events.is_empty());
    assert!(!dir.path().join("events/issue-0.json").exists());
}

#[test]
fn empty_batch_is_a_noop() {
    let dir = tempdir().unwrap();
    let log = ChangeEventLog::new(dir.path());
    log.append(&[]).unwrap();
    assert!(!dir.path().join("events").exists());
}
