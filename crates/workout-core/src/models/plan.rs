// ABOUTME: Workout plan shapes: provider-facing loose and flat plans, canonical TodayPlan
// ABOUTME: Also defines the named schema versions a provider's structured output can follow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Energy;

/// Named wire-format contract a provider's structured output must satisfy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Blocks carry nested exercises (current default)
    #[default]
    Nested,
    /// Exercises live in a sibling array keyed by block index
    Flat,
}

impl SchemaVersion {
    /// Every known schema version
    pub const ALL: [Self; 2] = [Self::Nested, Self::Flat];

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Flat => "flat",
        }
    }

    /// Parse a version identifier (case-insensitive)
    #[must_use]
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nested" => Some(Self::Nested),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exercise as produced by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmExercise {
    /// Exercise name
    pub name: String,
    /// Sets/reps/time prescription (e.g. "3 x 12")
    pub prescription: String,
    /// Optional coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Block as produced by a provider, with nested exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmBlock {
    /// Block title (e.g. "Warm-up")
    pub title: String,
    /// Block length in minutes
    pub duration_minutes: u32,
    /// Block focus
    pub focus: String,
    /// Exercises in order
    pub exercises: Vec<LlmExercise>,
}

/// Provider-facing plan without identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmPlan {
    /// Overall focus
    pub focus: String,
    /// Total length in minutes
    pub duration_minutes: u32,
    /// Equipment used
    pub equipment: Vec<String>,
    /// Origin of the plan
    pub source: String,
    /// Intensity
    pub energy: Energy,
    /// One-paragraph summary
    pub summary: String,
    /// Ordered blocks
    pub blocks: Vec<LlmBlock>,
}

/// Block in the flat wire shape (no nested exercises)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmFlatBlock {
    /// Block title
    pub title: String,
    /// Block length in minutes
    pub duration_minutes: u32,
    /// Block focus
    pub focus: String,
}

/// Exercise in the flat wire shape, pointing at its block by index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmFlatExercise {
    /// Index into `blocks`
    pub block_index: i64,
    /// Position within the block
    pub order: i64,
    /// Exercise name
    pub name: String,
    /// Sets/reps/time prescription
    pub prescription: String,
    /// Optional coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Flat alternate wire shape used to reduce response size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmPlanFlat {
    /// Overall focus
    pub focus: String,
    /// Total length in minutes
    pub duration_minutes: u32,
    /// Equipment used
    pub equipment: Vec<String>,
    /// Origin of the plan
    pub source: String,
    /// Intensity
    pub energy: Energy,
    /// One-paragraph summary
    pub summary: String,
    /// Ordered blocks without exercises
    pub blocks: Vec<LlmFlatBlock>,
    /// All exercises, keyed by block index and order
    pub exercises: Vec<LlmFlatExercise>,
}

/// Canonical exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Generated identifier
    pub id: String,
    /// Exercise name
    pub name: String,
    /// Sets/reps/time prescription
    pub prescription: String,
    /// Optional coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Canonical block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Generated identifier
    pub id: String,
    /// Block title
    pub title: String,
    /// Block length in minutes
    pub duration_minutes: u32,
    /// Block focus
    pub focus: String,
    /// Exercises in order (never empty)
    pub exercises: Vec<Exercise>,
}

/// Canonical plan: the only shape persisted or returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayPlan {
    /// Generated identifier
    pub id: String,
    /// Overall focus
    pub focus: String,
    /// Total length in minutes
    pub duration_minutes: u32,
    /// Equipment used
    pub equipment: Vec<String>,
    /// Origin of the plan
    pub source: String,
    /// Intensity
    pub energy: Energy,
    /// One-paragraph summary
    pub summary: String,
    /// Ordered blocks (never empty)
    pub blocks: Vec<Block>,
}

impl From<&TodayPlan> for LlmPlan {
    fn from(plan: &TodayPlan) -> Self {
        Self {
            focus: plan.focus.clone(),
            duration_minutes: plan.duration_minutes,
            equipment: plan.equipment.clone(),
            source: plan.source.clone(),
            energy: plan.energy,
            summary: plan.summary.clone(),
            blocks: plan
                .blocks
                .iter()
                .map(|block| LlmBlock {
                    title: block.title.clone(),
                    duration_minutes: block.duration_minutes,
                    focus: block.focus.clone(),
                    exercises: block
                        .exercises
                        .iter()
                        .map(|exercise| LlmExercise {
                            name: exercise.name.clone(),
                            prescription: exercise.prescription.clone(),
                            detail: exercise.detail.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
