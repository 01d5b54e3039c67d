// ABOUTME: Generation context consumed read-only by prompt builders and provider adapters
// ABOUTME: User profile, preferences, training environment, and recent session summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::{Energy, GenerationRequest, WorkoutSessionSummary};

/// Who the plan is for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Self-reported training experience (e.g. "beginner")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Training goals
    pub goals: Vec<String>,
    /// Injuries or limitations to respect
    pub limitations: Vec<String>,
}

/// How the user likes to train
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Preferred focus when none is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_bias: Option<String>,
    /// Preferred intensity when none is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<Energy>,
    /// Exercises the user does not want
    pub avoid_exercises: Vec<String>,
}

/// Where and with what the user trains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingEnvironment {
    /// Available equipment
    pub equipment: Vec<String>,
    /// Time budget in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,
    /// Location hint (e.g. "home", "gym")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Everything a provider needs to personalise a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationContext {
    /// User profile
    pub profile: UserProfile,
    /// Preferences
    pub preferences: Preferences,
    /// Training environment
    pub environment: TrainingEnvironment,
    /// Most recent completed sessions, newest first
    pub recent_sessions: Vec<WorkoutSessionSummary>,
}

impl GenerationContext {
    /// Layer a request's quick-action values on top of this context
    ///
    /// Request values always replace whatever the client context carried for
    /// energy, equipment, time, and focus bias.
    #[must_use]
    pub fn with_request_overrides(mut self, request: &GenerationRequest) -> Self {
        if let Some(energy) = request.energy {
            self.preferences.energy = Some(energy);
        }
        if let Some(equipment) = request.equipment.as_ref().filter(|e| !e.is_empty()) {
            self.environment.equipment.clone_from(equipment);
        }
        if let Some(minutes) = request.time_minutes {
            self.environment.time_minutes = Some(minutes);
        }
        if let Some(focus) = request.focus.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            self.preferences.focus_bias = Some(focus.to_owned());
        }
        self
    }
}
