// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;

use crate::DaemonError;

/// Resolve the on-disk store directory: `HUBMIRROR_DB_DIR` > `XDG_STATE_HOME/hubmirror` > `~/.local/state/hubmirror`.
pub fn db_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("HUBMIRROR_DB_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("hubmirror"));
    }
    let home = dirs::home_dir().ok_or(DaemonError::NoStateDir)?;
    Ok(home.join(".local/state/hubmirror"))
}

/// Path to the JSON-encoded [`hubmirror_core::EngineConfig`], required.
pub fn config_path() -> Result<PathBuf, DaemonError> {
    std::env::var("HUBMIRROR_CONFIG_PATH").map(PathBuf::from).map_err(|_| DaemonError::MissingConfigPath)
}

/// Upstream base url, username, and token, forwarded untouched to
/// [`hubmirror_adapters::GithubUpstreamClient`].
pub fn upstream_credentials() -> Result<(String, String, String), DaemonError> {
    let base_url = std::env::var("HUBMIRROR_UPSTREAM_URL").unwrap_or_else(|_| "https://api.github.com".to_string());
    let username = std::env::var("HUBMIRROR_USERNAME").map_err(|_| DaemonError::MissingCredential("HUBMIRROR_USERNAME"))?;
    let token = std::env::var("HUBMIRROR_TOKEN").map_err(|_| DaemonError::MissingCredential("HUBMIRROR_TOKEN"))?;
    Ok((base_url, username, token))
}
