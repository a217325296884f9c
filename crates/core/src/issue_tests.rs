// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn resolve_login_passes_through_real_login() {
    assert_eq!(resolve_login(Some("jgwest")), "jgwest");
}

#[test]
fn resolve_login_falls_back_to_ghost_on_none() {
    assert_eq!(resolve_login(None), GHOST);
}

#[test]
fn resolve_login_falls_back_to_ghost_on_empty_string() {
    assert_eq!(resolve_login(Some("")), GHOST);
}

#[test]
fn dedup_assignees_preserves_first_seen_order() {
    let assignees = vec!["chetan-rns".to_string(), "jgwest".to_string(), "chetan-rns".to_string()];
    assert_eq!(Issue::dedup_assignees(assignees), vec!["chetan-rns", "jgwest"]);
}

#[test]
fn unknown_event_kind_is_dropped_silently() {
    assert!(IssueEventKind::parse("subscribed", None, None, None, None, None).is_none());
}

#[test]
fn labeled_without_label_payload_is_dropped() {
    assert!(IssueEventKind::parse("labeled", None, None, None, None, None).is_none());
}

#[test]
fn assigned_normalizes_missing_logins_to_ghost() {
    let kind = IssueEventKind::parse("assigned", None, Some("jgwest"), None, None, None).unwrap();
    assert_eq!(kind, IssueEventKind::Assigned { assignee: GHOST.to_string(), assigner: "jgwest".to_string() });
}

#[test]
fn renamed_round_trips_through_json() {
    let event = IssueEvent {
        kind: IssueEventKind::Renamed { from: "old".to_string(), to: "new".to_string() },
        created_at: chrono::Utc::now(),
        actor_login: "jgwest".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    let decoded: IssueEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(event, decoded);
}
