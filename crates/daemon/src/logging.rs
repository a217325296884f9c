// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installs the process-wide [`tracing`] subscriber. Mirrors the env-filter
//! + optional rolling file appender the config's `log_dir` knob implies.

use tracing_subscriber::EnvFilter;

/// Must be held for the process lifetime when file logging is enabled — the
/// non-blocking writer stops flushing once its guard drops.
pub struct LoggingGuard(Option<tracing_appender::non_blocking::WorkerGuard>);

pub fn init(log_dir: Option<&str>) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hubmirror.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).with_ansi(false).init();
            LoggingGuard(Some(guard))
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            LoggingGuard(None)
        }
    }
}
