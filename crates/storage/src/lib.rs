// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hubmirror-storage: the file-backed content store, change-event log, and
//! processed-events set that together own every byte the engine persists.

pub mod change_event_log;
pub mod content_store;
pub mod error;
pub mod paths;
pub mod processed_events;

pub use change_event_log::ChangeEventLog;
pub use content_store::ContentStore;
pub use error::StoreError;
pub use paths::StoreKey;
pub use processed_events::ProcessedEventsSet;
