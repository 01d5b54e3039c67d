// ABOUTME: Thin read and write boundaries over the generation and session stores
// ABOUTME: Snapshot assembly and completed-session logging used by the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Completed-session logging
pub mod log;
/// Home-screen snapshot
pub mod snapshot;

pub use log::{log_session, scheduled_date, LogSessionBody};
pub use snapshot::{build_snapshot, quick_actions, OfflineHint, QuickAction, QuickActionKind, Snapshot};
