// ABOUTME: Generation store: per-device state machine over plan, status, and schema metadata
// ABOUTME: idle -> pending -> idle on success, idle/pending -> error on failure, clear back to idle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use workout_core::models::{
    GenerationPhase, GenerationState, GenerationStatus, TodayPlan, TransformationMetadata,
};

/// Per-device generation state machine
///
/// Entries are created lazily as `{plan: null, status: idle}` on first touch.
#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// Current state for a device (owned clone)
    async fn get_state(&self, device_token: &str) -> GenerationState;

    /// Enter `pending` with a fresh `submittedAt`; the stored plan is untouched
    async fn mark_pending(&self, device_token: &str, eta_seconds: u32);

    /// Replace the plan, return to `idle`, and overwrite or clear metadata
    async fn persist_plan(
        &self,
        device_token: &str,
        plan: TodayPlan,
        metadata: Option<TransformationMetadata>,
    );

    /// Enter `error`, keeping the stored plan and any earlier `submittedAt`
    async fn set_error(&self, device_token: &str, message: &str);

    /// Drop the plan and metadata and return to `idle`
    async fn clear_plan(&self, device_token: &str);

    /// Remove every entry
    async fn reset(&self);
}

/// In-memory [`GenerationStore`] keyed by device token
#[derive(Debug, Default)]
pub struct InMemoryGenerationStore {
    states: DashMap<String, GenerationState>,
}

impl InMemoryGenerationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, device_token: &str, apply: impl FnOnce(&mut GenerationState)) {
        let mut entry = self.states.entry(device_token.to_owned()).or_default();
        apply(entry.value_mut());
    }
}

#[async_trait]
impl GenerationStore for InMemoryGenerationStore {
    async fn get_state(&self, device_token: &str) -> GenerationState {
        self.states
            .entry(device_token.to_owned())
            .or_default()
            .value()
            .clone()
    }

    async fn mark_pending(&self, device_token: &str, eta_seconds: u32) {
        self.update(device_token, |state| {
            state.generation_status = GenerationStatus {
                state: GenerationPhase::Pending,
                submitted_at: Some(Utc::now()),
                eta_seconds: Some(eta_seconds),
                message: None,
            };
        });
    }

    async fn persist_plan(
        &self,
        device_token: &str,
        plan: TodayPlan,
        metadata: Option<TransformationMetadata>,
    ) {
        self.update(device_token, |state| {
            state.plan = Some(plan);
            state.generation_status = GenerationStatus::default();
            state.transformation_metadata = metadata;
        });
    }

    async fn set_error(&self, device_token: &str, message: &str) {
        self.update(device_token, |state| {
            let submitted_at = state.generation_status.submitted_at.or_else(|| Some(Utc::now()));
            state.generation_status = GenerationStatus {
                state: GenerationPhase::Error,
                submitted_at,
                eta_seconds: None,
                message: Some(message.to_owned()),
            };
        });
    }

    async fn clear_plan(&self, device_token: &str) {
        self.update(device_token, |state| {
            *state = GenerationState::default();
        });
    }

    async fn reset(&self) {
        self.states.clear();
    }
}
