// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hubmirror_adapters::QuotaSnapshot;
use hubmirror_core::FakeClock;

fn queue() -> WorkQueue<FakeClock> {
    WorkQueue::new(
        FakeClock::new(),
        PacingConfig {
            configured_requests_per_hour: 3600,
            configured_pause_ms: 500,
        },
    )
}

#[test]
fn duplicate_repository_push_is_rejected() {
    let q = queue();
    let unit = RepositoryWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), repository_id: None };
    assert!(q.push(WorkUnit::Repository(unit.clone())));
    assert!(!q.push(WorkUnit::Repository(unit)));
    assert_eq!(q.available_work(), 1);
}

#[test]
fn owner_repo_list_key_is_order_independent() {
    let q = queue();
    let a = OwnerWork::repo_list(Owner::Organization("eclipse".to_string()), vec!["b".to_string(), "a".to_string()]);
    let b = OwnerWork::repo_list(Owner::Organization("eclipse".to_string()), vec!["a".to_string(), "b".to_string()]);
    assert!(q.push(WorkUnit::Owner(a)));
    assert!(!q.push(WorkUnit::Owner(b)));
}

#[test]
fn push_user_skips_already_seen_logins_without_retry() {
    let q = queue();
    assert!(q.push_user("jgwest", false));
    assert!(!q.push_user("jgwest", false));
    assert_eq!(q.available_work(), 1);
}

#[test]
fn push_user_retry_bypasses_ever_seen_but_not_pending() {
    let q = queue();
    assert!(q.push_user("jgwest", false));
    // Still pending (never polled), so even a retry can't duplicate it.
    assert!(!q.push_user("jgwest", true));

    let unit = q.poll().expect("pacing gate starts open");
    q.mark_processed(&unit).unwrap();

    // Now it's fully drained, so the retry path can re-add it.
    assert!(q.push_user("jgwest", true));
}

#[test]
fn poll_returns_none_before_the_pacing_deadline() {
    let clock = FakeClock::new();
    let q = WorkQueue::new(
        clock.clone(),
        PacingConfig { configured_requests_per_hour: 3600, configured_pause_ms: 500 },
    );
    q.push(WorkUnit::User(UserWork { login: "a".to_string() }));
    let unit = q.poll().unwrap();
    q.advance_pacing(unit.kind());
    q.mark_processed(&unit).unwrap();

    q.push(WorkUnit::User(UserWork { login: "b".to_string() }));
    assert!(q.poll().is_none());

    clock.advance(std::time::Duration::from_secs(3600));
    assert!(q.poll().is_some());
}

#[test]
fn priority_order_is_owner_repository_issue_user() {
    let q = queue();
    q.push(WorkUnit::User(UserWork { login: "a".to_string() }));
    q.push(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 1 }));
    q.push(WorkUnit::Repository(RepositoryWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), repository_id: None }));
    q.push(WorkUnit::Owner(OwnerWork::full(Owner::Organization("eclipse".to_string()))));

    assert_eq!(q.poll().unwrap().kind(), WorkKind::Owner);
    assert_eq!(q.poll().unwrap().kind(), WorkKind::Repository);
    assert_eq!(q.poll().unwrap().kind(), WorkKind::Issue);
    assert_eq!(q.poll().unwrap().kind(), WorkKind::User);
}

#[test]
fn mark_processed_without_a_prior_poll_is_an_error() {
    let q = queue();
    let unit = WorkUnit::User(UserWork { login: "ghost".to_string() });
    assert!(q.mark_processed(&unit).is_err());
}

#[test]
fn is_drained_reflects_both_pending_and_active_work() {
    let q = queue();
    assert!(q.is_drained());

    q.push(WorkUnit::User(UserWork { login: "a".to_string() }));
    assert!(!q.is_drained());

    let unit = q.poll().unwrap();
    assert!(!q.is_drained(), "unit is active, not yet marked processed");

    q.mark_processed(&unit).unwrap();
    assert!(q.is_drained());
}

#[test]
fn stop_accepting_blocks_further_polls() {
    let q = queue();
    q.push(WorkUnit::User(UserWork { login: "a".to_string() }));
    q.stop_accepting();
    assert!(q.poll().is_none());
}

#[test]
fn quota_aware_pacing_falls_back_to_blind_formula_when_wait_seconds_is_zero() {
    let clock = FakeClock::new();
    let q = WorkQueue::new(
        clock,
        PacingConfig { configured_requests_per_hour: 3600, configured_pause_ms: 1000 },
    );
    q.record_quota(Some(QuotaSnapshot { remaining: 5000, seconds_to_reset: 0, total_hourly_limit: 5000 }));
    let before = q.next_work_available_at();
    q.advance_pacing(WorkKind::User);
    let after = q.next_work_available_at();
    assert_eq!(after - before, Duration::from_millis(1 * 1000));
}

#[test]
fn wait_if_needed_only_extends_the_deadline_forward() {
    let q = queue();
    let initial = q.next_work_available_at();
    q.wait_if_needed(WorkKind::Issue, 1);
    assert!(q.next_work_available_at() >= initial);
}
