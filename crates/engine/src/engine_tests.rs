// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use hubmirror_adapters::FakeUpstreamClient;
use hubmirror_core::{FakeClock, IndividualRepoConfig, Owner, OwnerTarget, ResourceChangeEvent};

use super::*;
use crate::filter::AllowAll;
use crate::queue::{OwnerWork, WorkUnit};

fn config() -> EngineConfig {
    EngineConfig {
        owner_targets: vec![OwnerTarget { owner: Owner::Organization("eclipse".to_string()), event_scan_interval_secs: None }],
        individual_repos: vec![IndividualRepoConfig { owner: Owner::User("jgwest".to_string()), repo_name: "dotfiles".to_string(), event_scan_interval_secs: None }],
        global_hourly_request_limit: 3600,
        global_pause_ms: 1,
        global_event_scan_interval_secs: 300,
        log_dir: None,
        pre_shared_key: "shh".to_string(),
    }
}

fn build() -> (Arc<Engine<FakeClock>>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::with_clock(dir.path(), config(), Arc::new(FakeUpstreamClient::new()) as Arc<dyn UpstreamClient>, Arc::new(AllowAll), FakeClock::new()).unwrap();
    (Arc::new(engine), dir)
}

#[test]
fn an_invalid_configuration_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let owner = Owner::Organization("eclipse".to_string());
    let bad = EngineConfig {
        owner_targets: vec![OwnerTarget { owner: owner.clone(), event_scan_interval_secs: None }],
        individual_repos: vec![IndividualRepoConfig { owner, repo_name: "che".to_string(), event_scan_interval_secs: None }],
        global_hourly_request_limit: 3600,
        global_pause_ms: 1,
        global_event_scan_interval_secs: 300,
        log_dir: None,
        pre_shared_key: "shh".to_string(),
    };

    let err = Engine::with_clock(dir.path(), bad, Arc::new(FakeUpstreamClient::new()) as Arc<dyn UpstreamClient>, Arc::new(AllowAll), FakeClock::new()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidConfig(_)));
}

#[tokio::test]
async fn a_cold_start_scan_enqueues_every_configured_owner() {
    let (engine, _dir) = build();

    engine.scheduler().tick().await;

    assert!(engine.full_scan_in_progress());
    assert_eq!(engine.queue().available_work(), 2);
}

#[tokio::test]
async fn trigger_full_scan_forces_one_on_the_next_tick_even_the_same_day() {
    let (engine, _dir) = build();
    engine.scheduler().tick().await;
    while engine.queue().poll().is_some() {}
    for unit in [WorkUnit::Owner(OwnerWork::full(Owner::Organization("eclipse".to_string()))), WorkUnit::Owner(OwnerWork::repo_list(Owner::User("jgwest".to_string()), vec!["dotfiles".to_string()]))] {
        let _ = engine.queue().mark_processed(&unit);
    }
    engine.scheduler().tick().await;
    assert!(!engine.full_scan_in_progress());
    assert_eq!(engine.queue().available_work(), 0);

    engine.trigger_full_scan();
    engine.scheduler().tick().await;

    assert!(engine.full_scan_in_progress());
    assert_eq!(engine.queue().available_work(), 2);
}

#[test]
fn recent_changes_since_surfaces_appended_events() {
    let (engine, _dir) = build();
    let event = ResourceChangeEvent::new(5_000, "eclipse", "che", 7);
    engine.change_log().append(std::slice::from_ref(&event)).unwrap();

    let changes = engine.recent_changes_since(1_000).unwrap();

    assert_eq!(changes, vec![event]);
    assert!(engine.recent_changes_since(10_000).unwrap().is_empty());
}
