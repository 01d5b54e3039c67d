// ABOUTME: Completed workout session records kept in per-device history
// ABOUTME: Summary shape for lists plus full per-exercise, per-set detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit for a logged load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms
    Kg,
    /// Pounds
    Lb,
}

/// Weight lifted for a set; weight and unit always travel together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Amount lifted
    pub weight: f64,
    /// Unit of `weight`
    pub unit: WeightUnit,
}

/// One logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    /// Repetitions performed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Load used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<Load>,
    /// Rate of perceived exertion (1-10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f32>,
    /// Whether the set was finished
    pub completed: bool,
}

/// One exercise within a logged session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExercise {
    /// Exercise name
    pub name: String,
    /// Logged sets in order
    pub sets: Vec<SetLog>,
}

/// Completed-session record used in lists and as generation context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionSummary {
    /// Session identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Focus of the session
    pub focus: String,
    /// Session length in minutes
    pub duration_minutes: u32,
    /// When the session finished
    pub completed_at: DateTime<Utc>,
    /// When the session started (`completed_at` minus the duration)
    pub scheduled_date: DateTime<Utc>,
    /// Origin of the session's plan
    pub source: String,
}

/// Completed session with per-exercise, per-set detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    /// Summary fields
    #[serde(flatten)]
    pub summary: WorkoutSessionSummary,
    /// Logged exercises
    pub exercises: Vec<SessionExercise>,
}
