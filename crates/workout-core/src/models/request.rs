// ABOUTME: Generation request model and its enumerations
// ABOUTME: Energy levels and structured regeneration feedback tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested intensity of a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    /// Low intensity
    Easy,
    /// Normal intensity
    #[default]
    Moderate,
    /// High intensity
    Intense,
}

impl Energy {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured reason a user asked for a different plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTag {
    /// Previous plan was too demanding
    TooHard,
    /// Previous plan was not demanding enough
    TooEasy,
    /// User wants a different exercise selection
    DifferentExercises,
    /// No specific complaint
    JustTryAgain,
}

/// Immutable input to one generation attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Requested workout length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,
    /// Requested focus (e.g. "upper body")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    /// Available equipment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    /// Requested intensity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<Energy>,
    /// Provider response being regenerated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
    /// Structured feedback on the previous plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Vec<FeedbackTag>>,
    /// Free-form notes from the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GenerationRequest {
    /// Whether this request regenerates a previous provider response
    #[must_use]
    pub fn is_regeneration(&self) -> bool {
        self.previous_response_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Whether any structured parameter (duration, focus, equipment, energy) was given
    #[must_use]
    pub fn has_parameter_deltas(&self) -> bool {
        self.time_minutes.is_some()
            || self.focus.as_deref().is_some_and(|f| !f.trim().is_empty())
            || self.equipment.as_ref().is_some_and(|e| !e.is_empty())
            || self.energy.is_some()
    }

    /// Trimmed notes, if any non-blank notes were given
    #[must_use]
    pub fn trimmed_notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_names() {
        let request: GenerationRequest = serde_json::from_value(serde_json::json!({
            "timeMinutes": 25,
            "energy": "intense",
            "previousResponseId": "resp_1",
            "feedback": ["too-hard", "just-try-again"]
        }))
        .unwrap();
        assert_eq!(request.time_minutes, Some(25));
        assert_eq!(request.energy, Some(Energy::Intense));
        assert!(request.is_regeneration());
        assert_eq!(
            request.feedback,
            Some(vec![FeedbackTag::TooHard, FeedbackTag::JustTryAgain])
        );
    }

    #[test]
    fn test_parameter_deltas() {
        assert!(!GenerationRequest::default().has_parameter_deltas());
        let blank_focus = GenerationRequest {
            focus: Some("  ".to_owned()),
            ..GenerationRequest::default()
        };
        assert!(!blank_focus.has_parameter_deltas());
        let with_energy = GenerationRequest {
            energy: Some(Energy::Easy),
            ..GenerationRequest::default()
        };
        assert!(with_energy.has_parameter_deltas());
    }
}
