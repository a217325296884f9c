// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn repository_path_nests_under_owner_then_repo() {
    let key = StoreKey::Repository {
        owner: "microclimate-dev2ops",
        repo: "microclimate-vscode-tools",
    };
    assert_eq!(
        key.relative_path(),
        PathBuf::from("microclimate-dev2ops/microclimate-vscode-tools/microclimate-vscode-tools.json")
    );
}

#[test]
fn issue_path_uses_bare_issue_number_as_filename() {
    let key = StoreKey::Issue {
        owner: "microclimate-dev2ops",
        repo: "microclimate-vscode-tools",
        number: 26,
    };
    assert_eq!(
        key.relative_path(),
        PathBuf::from("microclimate-dev2ops/microclimate-vscode-tools/26.json")
    );
}

#[test]
fn organization_path_self_nests_by_name() {
    let key = StoreKey::Organization { name: "eclipse" };
    assert_eq!(key.relative_path(), PathBuf::from("eclipse/eclipse.json"));
}

#[test]
fn user_path_lives_under_users_dir() {
    let key = StoreKey::User { login: "jgwest" };
    assert_eq!(key.relative_path(), PathBuf::from("users/jgwest.json"));
}

#[test]
fn scalar_key_path_lives_under_keys_dir() {
    assert_eq!(scalar_key_path("lastFullScanStart"), PathBuf::from("keys/lastFullScanStart.txt"));
}
