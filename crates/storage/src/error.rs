// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store-level error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An internal invariant was violated — e.g. a change event with no timestamp.
    #[error("store invariant violated: {0}")]
    Invariant(String),
}

impl From<StoreError> for hubmirror_core::IngestionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { path, source } => hubmirror_core::IngestionError::StoreIo { path: path.display().to_string(), source },
            other => hubmirror_core::IngestionError::Invariant(other.to_string()),
        }
    }
}
