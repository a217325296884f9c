// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reads an [`EngineConfig`] from disk. Parsing a richer config file format
//! (TOML, HCL, flags) is the excluded collaborator's job — this binary only
//! expects the already-validated JSON shape that collaborator would emit.

use std::path::Path;

use hubmirror_core::EngineConfig;

use crate::DaemonError;

pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, DaemonError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DaemonError::ConfigIo { path: path.to_path_buf(), source })?;
    let config: EngineConfig = serde_json::from_str(&raw).map_err(|source| DaemonError::ConfigParse { path: path.to_path_buf(), source })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_loader_tests.rs"]
mod tests;
