// ABOUTME: Bounded, ordered per-device history of completed workout sessions
// ABOUTME: Newest first, truncated to the configured limit, isolated per device token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use dashmap::DashMap;
use workout_core::constants::defaults;
use workout_core::models::{WorkoutSession, WorkoutSessionSummary};

/// Owned snapshot of one device's history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHistory {
    /// Summaries, newest first
    pub summaries: Vec<WorkoutSessionSummary>,
    /// Most recent full session, if any
    pub latest: Option<WorkoutSession>,
}

/// Per-device bounded session history
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Prepend a session and truncate to the limit; returns the stored summary
    async fn persist_logged_session(
        &self,
        device_token: &str,
        session: WorkoutSession,
    ) -> WorkoutSessionSummary;

    /// Summaries newest first (owned clones)
    async fn recent_sessions(&self, device_token: &str) -> Vec<WorkoutSessionSummary>;

    /// Summaries plus the most recent full session (owned clones)
    async fn history(&self, device_token: &str) -> SessionHistory;

    /// Maximum sessions kept per device
    fn limit(&self) -> usize;

    /// Remove every entry
    async fn reset(&self);
}

#[derive(Debug, Default)]
struct DeviceSessions {
    summaries: Vec<WorkoutSessionSummary>,
    sessions: Vec<WorkoutSession>,
}

/// In-memory [`SessionStore`]
#[derive(Debug)]
pub struct InMemorySessionStore {
    limit: usize,
    devices: DashMap<String, DeviceSessions>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(defaults::RECENT_SESSION_LIMIT)
    }
}

impl InMemorySessionStore {
    /// Create a store keeping at most `limit` sessions per device (minimum 1)
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            devices: DashMap::new(),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn persist_logged_session(
        &self,
        device_token: &str,
        session: WorkoutSession,
    ) -> WorkoutSessionSummary {
        let summary = session.summary.clone();
        let mut entry = self.devices.entry(device_token.to_owned()).or_default();
        let device = entry.value_mut();
        device.summaries.insert(0, summary.clone());
        device.sessions.insert(0, session);
        device.summaries.truncate(self.limit);
        device.sessions.truncate(self.limit);
        summary
    }

    async fn recent_sessions(&self, device_token: &str) -> Vec<WorkoutSessionSummary> {
        self.devices
            .get(device_token)
            .map(|device| device.summaries.clone())
            .unwrap_or_default()
    }

    async fn history(&self, device_token: &str) -> SessionHistory {
        self.devices
            .get(device_token)
            .map(|device| SessionHistory {
                summaries: device.summaries.clone(),
                latest: device.sessions.first().cloned(),
            })
            .unwrap_or_default()
    }

    fn limit(&self) -> usize {
        self.limit
    }

    async fn reset(&self) {
        self.devices.clear();
    }
}
