// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `hubmirrord` binary: loads an [`hubmirror_core::EngineConfig`],
//! builds an [`hubmirror_engine::Engine`] against a real upstream, and runs
//! it forever. Binding an HTTP read API or a CLI socket is the excluded
//! collaborator's job; this binary only runs the ingestion engine.

use std::process::ExitCode;
use std::sync::Arc;

use hubmirror_adapters::{GithubUpstreamClient, UpstreamClient};
use hubmirror_daemon::{env, load_config_from_path, logging, DaemonError};
use hubmirror_engine::{AllowAll, Engine, Filter};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hubmirrord: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = load_config_from_path(&env::config_path()?)?;
    let _logging_guard = logging::init(config.log_dir.as_deref());

    let db_dir = env::db_dir()?;
    let (base_url, username, token) = env::upstream_credentials()?;
    let upstream: Arc<dyn UpstreamClient> = Arc::new(GithubUpstreamClient::new(base_url, username, token));
    let filter: Arc<dyn Filter> = Arc::new(AllowAll);

    tracing::info!(db_dir = %db_dir.display(), "starting hubmirrord");
    let engine = Arc::new(Engine::new(db_dir, config, upstream, filter)?);
    let handle = engine.spawn();

    let _ = handle.scheduler_task.await;
    for worker in handle.worker_tasks {
        let _ = worker.await;
    }
    Ok(())
}
