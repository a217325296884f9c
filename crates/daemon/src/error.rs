// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine a state directory: set HUBMIRROR_DB_DIR")]
    NoStateDir,
    #[error("HUBMIRROR_CONFIG_PATH is not set")]
    MissingConfigPath,
    #[error("missing required environment variable {0}")]
    MissingCredential(&'static str),
    #[error("failed to read config file {path}")]
    ConfigIo { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}")]
    ConfigParse { path: PathBuf, source: serde_json::Error },
    #[error("invalid configuration")]
    InvalidConfig(#[from] hubmirror_core::ConfigError),
    #[error(transparent)]
    Ingestion(#[from] hubmirror_core::IngestionError),
}
