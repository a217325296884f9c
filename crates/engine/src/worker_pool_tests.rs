// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::num::NonZeroUsize;
use std::time::Duration;

use hubmirror_adapters::{FakeUpstreamClient, IssueSummary, RepoSummary};
use hubmirror_core::{FakeClock, Issue, IssueComment, Owner};

use super::*;
use crate::filter::AllowAll;
use crate::queue::PacingConfig;

/// Poll `check` until it is true, or panic after a few real seconds. Used
/// only for the tests that drive the worker pool's background loop rather
/// than calling `process` directly.
async fn wait_until(what: &str, check: impl Fn() -> bool) {
    for _ in 0..150 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for: {what}");
}

fn harness() -> (Arc<WorkerPool<FakeClock>>, Arc<FakeUpstreamClient>, Arc<CachingStore>, Arc<WorkQueue<FakeClock>>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CachingStore::new(dir.path(), NonZeroUsize::new(64).unwrap()));
    let change_log = Arc::new(ChangeEventLog::new(dir.path()));
    let upstream = Arc::new(FakeUpstreamClient::new());
    let queue = Arc::new(WorkQueue::new(
        FakeClock::new(),
        PacingConfig { configured_requests_per_hour: 3600, configured_pause_ms: 10 },
    ));
    let pool = Arc::new(WorkerPool::new(
        Arc::clone(&store),
        Arc::clone(&change_log),
        upstream.clone() as Arc<dyn UpstreamClient>,
        Arc::clone(&queue),
        Arc::new(AllowAll),
        FakeClock::new(),
    ));
    (pool, upstream, store, queue, dir)
}

fn sample_issue(owner: &str, repo: &str, number: u64, id: u64) -> Issue {
    Issue {
        id,
        owner: owner.to_string(),
        repo: repo.to_string(),
        number,
        title: "bug".to_string(),
        body: "it happened".to_string(),
        html_url: format!("https://example.invalid/{owner}/{repo}/issues/{number}"),
        reporter_login: "reporter".to_string(),
        assignee_logins: vec!["assignee".to_string()],
        labels: vec![],
        created_at: chrono::Utc::now(),
        closed_at: None,
        is_pull_request: false,
        is_closed: false,
        comments: vec![],
        issue_events: vec![],
    }
}

#[tokio::test]
async fn process_owner_enqueues_repositories_and_persists_organization() {
    let (pool, upstream, store, queue, _dir) = harness();
    upstream.seed_org_repos("eclipse", vec![RepoSummary { id: 1, name: "che".to_string() }, RepoSummary { id: 2, name: "theia".to_string() }]);

    pool.process(WorkUnit::Owner(OwnerWork::full(Owner::Organization("eclipse".to_string())))).await.unwrap();

    assert_eq!(queue.available_work(), 2);
    let org = store.get_organization("eclipse").unwrap().unwrap();
    assert_eq!(org.repository_names, vec!["che".to_string(), "theia".to_string()]);
}

#[tokio::test]
async fn process_owner_repo_list_uses_preresolved_names_without_an_upstream_call() {
    let (pool, _upstream, store, queue, _dir) = harness();
    let owner_work = OwnerWork::repo_list(Owner::User("jgwest".to_string()), vec!["repo-a".to_string(), "repo-b".to_string()]);

    pool.process(WorkUnit::Owner(owner_work)).await.unwrap();

    assert_eq!(queue.available_work(), 2);
    let listing = store.get_user_repositories("jgwest").unwrap().unwrap();
    assert_eq!(listing.repository_names, vec!["repo-a".to_string(), "repo-b".to_string()]);
}

#[tokio::test]
async fn process_repository_skips_pull_requests_and_tracks_the_issue_range() {
    let (pool, upstream, store, queue, _dir) = harness();
    upstream.seed_issues(
        "eclipse",
        "che",
        vec![
            IssueSummary { number: 1, is_pull_request: false },
            IssueSummary { number: 2, is_pull_request: true },
            IssueSummary { number: 5, is_pull_request: false },
        ],
    );

    pool.process(WorkUnit::Repository(RepositoryWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), repository_id: Some(42) }))
        .await
        .unwrap();

    assert_eq!(queue.available_work(), 2);
    let repository = store.get_repository("eclipse", "che").unwrap().unwrap();
    assert_eq!(repository.first_known_issue, Some(1));
    assert_eq!(repository.last_known_issue, Some(5));
    assert_eq!(repository.repository_id, 42);
}

#[tokio::test]
async fn process_issue_persists_comments_events_and_enqueues_users() {
    let (pool, upstream, store, queue, _dir) = harness();
    let issue = sample_issue("eclipse", "che", 7, 900);
    upstream.seed_issue(issue);
    upstream.seed_issue_comments(
        "eclipse",
        "che",
        7,
        vec![IssueComment { user_login: "commenter".to_string(), body: "+1".to_string(), created_at: chrono::Utc::now(), updated_at: chrono::Utc::now() }],
    );

    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 7 })).await.unwrap();

    let stored = store.get_issue("eclipse", "che", 7).unwrap().unwrap();
    assert_eq!(stored.comments.len(), 1);
    assert_eq!(queue.available_work(), 2); // reporter + assignee
}

#[tokio::test]
async fn process_issue_is_a_no_op_for_pull_requests() {
    let (pool, upstream, store, _queue, _dir) = harness();
    let mut issue = sample_issue("eclipse", "che", 8, 901);
    issue.is_pull_request = true;
    upstream.seed_issue(issue);

    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 8 })).await.unwrap();

    assert!(store.get_issue("eclipse", "che", 8).unwrap().is_none());
}

#[tokio::test]
async fn unchanged_issue_does_not_append_a_change_event() {
    let (pool, upstream, store, _queue, dir) = harness();
    let issue = sample_issue("eclipse", "che", 9, 902);
    upstream.seed_issue(issue.clone());

    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 9 })).await.unwrap();
    let change_log = ChangeEventLog::new(dir.path());
    let first_pass = change_log.recent_since(0, u64::MAX).unwrap().len();

    // Re-seed the identical issue and process again; canonical equality means no new event.
    upstream.seed_issue(issue);
    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 9 })).await.unwrap();
    let second_pass = change_log.recent_since(0, u64::MAX).unwrap().len();

    assert_eq!(first_pass, second_pass);
    assert!(store.get_issue("eclipse", "che", 9).unwrap().is_some());
}

#[tokio::test]
async fn a_changed_issue_appends_a_change_event() {
    let (pool, upstream, store, _queue, dir) = harness();
    let mut issue = sample_issue("eclipse", "che", 10, 903);
    upstream.seed_issue(issue.clone());
    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 10 })).await.unwrap();

    issue.title = "retitled".to_string();
    upstream.seed_issue(issue);
    pool.process(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 10 })).await.unwrap();

    let change_log = ChangeEventLog::new(dir.path());
    let events = change_log.recent_since(0, u64::MAX).unwrap();
    // One event for the initial persist, one for the title change.
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].issue_number, 10);
    assert_eq!(store.get_issue("eclipse", "che", 10).unwrap().unwrap().title, "retitled");
}

#[tokio::test]
async fn a_failed_unit_is_requeued_rather_than_silently_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CachingStore::new(dir.path(), NonZeroUsize::new(64).unwrap()));
    let change_log = Arc::new(ChangeEventLog::new(dir.path()));
    let upstream = Arc::new(FakeUpstreamClient::new());
    let clock = FakeClock::new();
    let queue = Arc::new(WorkQueue::new(clock.clone(), PacingConfig { configured_requests_per_hour: 3600, configured_pause_ms: 10 }));
    let pool = Arc::new(WorkerPool::new(
        Arc::clone(&store),
        Arc::clone(&change_log),
        upstream.clone() as Arc<dyn UpstreamClient>,
        Arc::clone(&queue),
        Arc::new(AllowAll),
        clock.clone(),
    ));

    // Not seeded yet: the first attempt fails with NotFound and must be
    // requeued, not dropped because its key is still marked active.
    queue.push(WorkUnit::Issue(IssueWork { owner: "eclipse".to_string(), repo_name: "che".to_string(), number: 11 }));
    let _handles = Arc::clone(&pool).spawn();

    wait_until("the failed unit to reappear as available work", || queue.available_work() == 1 && queue.active_resources() == 0).await;

    // Open the pacing gate and make the issue resolvable; the requeued unit
    // must still be the same one that gets retried.
    clock.advance(Duration::from_secs(10));
    upstream.seed_issue(sample_issue("eclipse", "che", 11, 777));

    wait_until("the requeued issue to be persisted on retry", || store.get_issue("eclipse", "che", 11).unwrap().is_some()).await;
}

#[tokio::test]
async fn process_user_tolerates_an_empty_login_as_a_no_op() {
    let (pool, upstream, store, _queue, _dir) = harness();
    upstream.seed_user(hubmirror_core::User { login: "ghostlike".to_string(), display_name: String::new(), email: String::new() });

    pool.process(WorkUnit::User(UserWork { login: "ghostlike".to_string() })).await.unwrap();
    assert!(store.get_user("ghostlike").unwrap().is_some());
}
