// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ingestion engine's error taxonomy, shared across the worker pool,
//! scanner, and scheduler so callers can decide retry/backoff behavior
//! without downcasting.

use thiserror::Error;

use crate::ConfigError;

/// Top-level error surfaced by any unit of ingestion work.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The upstream call failed in a way that is expected to clear on retry
    /// (timeout, connection reset, 5xx). The unit should be requeued.
    #[error("transient upstream failure for {resource}: {source}")]
    Transient {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The global hourly request budget is exhausted; no retry should be
    /// attempted until the pacing gate's `next_work_available_at` elapses.
    #[error("request quota exhausted until {retry_after_ms}ms")]
    QuotaExhausted { retry_after_ms: u64 },

    /// A unit of work exceeded its watchdog timeout without completing.
    #[error("work unit for {resource} stalled past its watchdog timeout")]
    Stalled { resource: String },

    /// A repository moved to a different owner between scans; the scanner
    /// must re-key the store entry rather than treat it as a fresh repo.
    #[error("repository {repo} moved from owner {from_owner} to {to_owner}")]
    CrossOwnerMove {
        repo: String,
        from_owner: String,
        to_owner: String,
    },

    /// The engine's configuration failed validation.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A content-store operation failed at the I/O layer.
    #[error("store I/O error at {path}: {source}")]
    StoreIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An internal invariant was violated; this indicates a bug rather than
    /// an environmental condition and should not be retried.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl IngestionError {
    /// Whether the worker pool should requeue this unit of work rather than
    /// drop it after logging.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestionError::Transient { .. } | IngestionError::QuotaExhausted { .. } | IngestionError::Stalled { .. })
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
