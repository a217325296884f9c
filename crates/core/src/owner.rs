// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner identification: an organization or a user account on the upstream
//! platform, used as the stable path prefix for every mirrored resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An organization or user account that parents a set of repositories.
///
/// Serializes as a tagged string using the `kind:name` display form so it can
/// be used directly as a store-key fragment and as a queue dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Organization(String),
    User(String),
}

impl Owner {
    /// Construct an organization owner, validating the name invariant.
    pub fn organization(name: impl Into<String>) -> Result<Self, InvalidOwnerName> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Owner::Organization(name))
    }

    /// Construct a user owner, validating the name invariant.
    pub fn user(name: impl Into<String>) -> Result<Self, InvalidOwnerName> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Owner::User(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Owner::Organization(n) | Owner::User(n) => n,
        }
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, Owner::Organization(_))
    }
}

fn validate_name(name: &str) -> Result<(), InvalidOwnerName> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(InvalidOwnerName(name.to_string()));
    }
    Ok(())
}

/// An owner name was empty or contained whitespace.
#[derive(Debug, Clone)]
pub struct InvalidOwnerName(pub String);

impl fmt::Display for InvalidOwnerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid owner name: {:?}", self.0)
    }
}

impl std::error::Error for InvalidOwnerName {}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Organization(n) => write!(f, "org:{n}"),
            Owner::User(n) => write!(f, "user:{n}"),
        }
    }
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
