// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn returns_the_tasks_value_on_normal_completion() {
    let result = run_with_heartbeat(|_progress| async { 42 }).await;
    assert_eq!(result, Some(42));
}

#[tokio::test(start_paused = true)]
async fn aborts_and_returns_none_after_the_progress_timeout() {
    let result = run_with_heartbeat(|_progress| async {
        // Never pings; sleeps far past the progress timeout.
        tokio::time::sleep(Duration::from_secs(10 * 60)).await;
        "unreachable"
    })
    .await;
    assert_eq!(result, None);
}

#[tokio::test(start_paused = true)]
async fn a_task_that_keeps_pinging_is_not_aborted() {
    let result = run_with_heartbeat(|progress| async move {
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_secs(30)).await;
            progress.ping();
        }
        "done"
    })
    .await;
    assert_eq!(result, Some("done"));
}
