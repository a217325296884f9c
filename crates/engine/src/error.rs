// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-local error types, layered under [`hubmirror_core::IngestionError`].
//!
//! Conversions from `StoreError` and `AdapterError` live in their own
//! crates (`hubmirror-storage`, `hubmirror-adapters`) instead of here —
//! the orphan rule requires an impl's implementing crate to own either the
//! trait or one of the types, and neither of those is true of this crate
//! for either conversion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// `mark_processed` was called for a unit that was never handed out by `poll`.
    #[error("markProcessed called for a unit with no matching prior poll: {0}")]
    UnmatchedMarkProcessed(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// A moved issue's refetched owner differs from the event's recorded owner.
    #[error("cross-owner move unsupported: {repo} moved from {from_owner} to {to_owner}")]
    CrossOwnerMove {
        repo: String,
        from_owner: String,
        to_owner: String,
    },
}

impl From<QueueError> for hubmirror_core::IngestionError {
    fn from(err: QueueError) -> Self {
        hubmirror_core::IngestionError::Invariant(err.to_string())
    }
}

impl From<ScanError> for hubmirror_core::IngestionError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::CrossOwnerMove { repo, from_owner, to_owner } => {
                hubmirror_core::IngestionError::CrossOwnerMove { repo, from_owner, to_owner }
            }
        }
    }
}

