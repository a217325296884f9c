// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hubmirror-adapters: the [`UpstreamClient`] boundary trait plus production
//! and test doubles for the upstream code-hosting platform.

pub mod error;
pub mod reqwest_client;
pub mod upstream_client;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use error::AdapterError;
pub use reqwest_client::GithubUpstreamClient;
pub use upstream_client::{IssueSummary, QuotaSnapshot, RawActivityEvent, RepoSummary, UpstreamClient};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeUpstreamClient;
