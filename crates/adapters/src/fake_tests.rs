// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn unseeded_org_returns_not_found() {
    let client = FakeUpstreamClient::new();
    let result = client.list_org_repos("eclipse").await;
    assert!(matches!(result, Err(AdapterError::NotFound(_))));
}

#[tokio::test]
async fn seeded_org_repos_round_trip() {
    let client = FakeUpstreamClient::new();
    let repos = vec![RepoSummary { id: 1, name: "microclimate-vscode-tools".to_string() }];
    client.seed_org_repos("eclipse", repos.clone());
    assert_eq!(client.list_org_repos("eclipse").await.unwrap(), repos);
}

#[tokio::test]
async fn unseeded_comments_and_events_default_to_empty_rather_than_erroring() {
    let client = FakeUpstreamClient::new();
    assert!(client.list_issue_comments("eclipse", "microclimate-vscode-tools", 26).await.unwrap().is_empty());
    assert!(client.list_repo_activity_events("eclipse", "microclimate-vscode-tools").await.unwrap().is_empty());
}

#[tokio::test]
async fn quota_snapshot_defaults_to_none() {
    let client = FakeUpstreamClient::new();
    assert_eq!(client.quota_snapshot().await.unwrap(), None);
}

#[tokio::test]
async fn seeded_quota_snapshot_round_trips() {
    let client = FakeUpstreamClient::new();
    let quota = QuotaSnapshot { remaining: 100, seconds_to_reset: 60, total_hourly_limit: 5_000 };
    client.seed_quota(quota);
    assert_eq!(client.quota_snapshot().await.unwrap(), Some(quota));
}
