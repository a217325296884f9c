// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hubmirror_core::{IndividualRepoConfig, Owner, OwnerTarget};

use super::*;

fn write_config(dir: &std::path::Path, config: &EngineConfig) -> std::path::PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_vec_pretty(config).unwrap()).unwrap();
    path
}

#[test]
fn a_valid_config_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        owner_targets: vec![OwnerTarget { owner: Owner::Organization("eclipse".to_string()), event_scan_interval_secs: None }],
        individual_repos: vec![],
        global_hourly_request_limit: 3600,
        global_pause_ms: 1,
        global_event_scan_interval_secs: 300,
        log_dir: None,
        pre_shared_key: "shh".to_string(),
    };
    let path = write_config(dir.path(), &config);

    let loaded = load_config_from_path(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn a_config_with_a_dual_listed_owner_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let owner = Owner::Organization("eclipse".to_string());
    let config = EngineConfig {
        owner_targets: vec![OwnerTarget { owner: owner.clone(), event_scan_interval_secs: None }],
        individual_repos: vec![IndividualRepoConfig { owner, repo_name: "che".to_string(), event_scan_interval_secs: None }],
        global_hourly_request_limit: 3600,
        global_pause_ms: 1,
        global_event_scan_interval_secs: 300,
        log_dir: None,
        pre_shared_key: "shh".to_string(),
    };
    let path = write_config(dir.path(), &config);

    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, DaemonError::InvalidConfig(_)));
}

#[test]
fn a_missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_from_path(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DaemonError::ConfigIo { .. }));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, DaemonError::ConfigParse { .. }));
}
