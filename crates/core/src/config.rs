// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration: which owners and individual repositories to mirror,
//! and the rate-limiting/scan-interval knobs that govern ingestion.
//!
//! Parsing a config file into this shape is the excluded collaborator's job;
//! this module only models the validated, in-memory result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Owner;

/// A whole organization or user account to mirror in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerTarget {
    pub owner: Owner,
    /// Overrides [`EngineConfig::event_scan_interval_secs`] for this owner's repos, if set.
    pub event_scan_interval_secs: Option<u64>,
}

/// A single repository to mirror without mirroring the rest of its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualRepoConfig {
    pub owner: Owner,
    pub repo_name: String,
    pub event_scan_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub owner_targets: Vec<OwnerTarget>,
    pub individual_repos: Vec<IndividualRepoConfig>,
    pub global_hourly_request_limit: u64,
    pub global_pause_ms: u64,
    pub global_event_scan_interval_secs: u64,
    pub log_dir: Option<String>,
    /// Passed through to the upstream client untouched; the engine never inspects it.
    pub pre_shared_key: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("owner {0} is configured both as a full owner target and via an individual repo entry")]
    OwnerListedBothFullyAndIndividually(String),
    #[error("global_hourly_request_limit must be greater than zero")]
    ZeroHourlyRequestLimit,
    #[error("global_event_scan_interval_secs must be greater than zero")]
    ZeroEventScanInterval,
}

impl EngineConfig {
    /// Enforces: no owner with a full owner target may also appear in the
    /// individual-repo list, and the rate knobs must be nonzero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_hourly_request_limit == 0 {
            return Err(ConfigError::ZeroHourlyRequestLimit);
        }
        if self.global_event_scan_interval_secs == 0 {
            return Err(ConfigError::ZeroEventScanInterval);
        }

        let full_owners: HashSet<&Owner> = self.owner_targets.iter().map(|t| &t.owner).collect();
        for individual in &self.individual_repos {
            if full_owners.contains(&individual.owner) {
                return Err(ConfigError::OwnerListedBothFullyAndIndividually(individual.owner.name().to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
