// ABOUTME: Per-device generation state: stored plan, status, and transformation metadata
// ABOUTME: Snapshot readers derive quick actions and hints from this structure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SchemaVersion, TodayPlan};

/// Phase of the per-device generation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPhase {
    /// Nothing in flight
    #[default]
    Idle,
    /// A provider call is in flight
    Pending,
    /// The last attempt failed
    Error,
}

/// Generation status exposed on snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    /// Current phase
    pub state: GenerationPhase,
    /// When the current or failed attempt was submitted
    pub submitted_at: Option<DateTime<Utc>>,
    /// Expected duration of a pending attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_seconds: Option<u32>,
    /// Failure message for the error phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Which schema version produced the stored plan, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationMetadata {
    /// Schema version the provider output followed
    pub schema_version: SchemaVersion,
    /// When the transformer produced the canonical plan
    pub transformed_at: DateTime<Utc>,
}

impl TransformationMetadata {
    /// Metadata stamped with the current time
    #[must_use]
    pub fn now(schema_version: SchemaVersion) -> Self {
        Self {
            schema_version,
            transformed_at: Utc::now(),
        }
    }
}

/// State kept for one device token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationState {
    /// Current plan, if any
    pub plan: Option<TodayPlan>,
    /// Generation status
    pub generation_status: GenerationStatus,
    /// Metadata describing how `plan` was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_metadata: Option<TransformationMetadata>,
}
