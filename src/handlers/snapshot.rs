// ABOUTME: Snapshot read boundary: current plan, quick actions, recent sessions, and status
// ABOUTME: Quick-action presets are re-derived from the stored plan on every read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use serde_json::{json, Value};
use workout_core::constants::defaults;
use workout_core::models::{Energy, GenerationStatus, TodayPlan, WorkoutSessionSummary};

use crate::stores::{GenerationStore, SessionStore};

/// Which request field a quick action pre-fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickActionKind {
    /// Workout length
    Time,
    /// Focus
    Focus,
    /// Equipment
    Equipment,
    /// Intensity
    Energy,
    /// Log a session done without a plan
    Backfill,
}

/// One quick-action preset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    /// Field the action targets
    pub key: QuickActionKind,
    /// Short label for the chip
    pub label: String,
    /// Value sent back with a generate request
    pub value: Value,
}

/// Whether the device can work offline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineHint {
    /// A plan is stored and can be followed offline
    pub offline_ready: bool,
    /// Hint text
    pub message: String,
}

/// Everything the home screen needs in one read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Current plan
    pub plan: Option<TodayPlan>,
    /// Five presets: time, focus, equipment, energy, backfill
    pub quick_actions: Vec<QuickAction>,
    /// Up to three most recent sessions
    pub recent_sessions: Vec<WorkoutSessionSummary>,
    /// Offline readiness
    pub offline_hint: OfflineHint,
    /// Generation status
    pub generation_status: GenerationStatus,
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Quick-action presets for a stored plan, or the defaults when none exists
#[must_use]
pub fn quick_actions(plan: Option<&TodayPlan>) -> Vec<QuickAction> {
    let minutes = plan.map_or(defaults::WORKOUT_MINUTES, |p| p.duration_minutes);
    let focus = plan.map_or(defaults::WORKOUT_FOCUS, |p| p.focus.as_str());
    let equipment: Vec<String> = plan
        .map(|p| p.equipment.clone())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| vec![defaults::WORKOUT_EQUIPMENT.to_owned()]);
    let energy = plan.map_or(Energy::default(), |p| p.energy);

    vec![
        QuickAction {
            key: QuickActionKind::Time,
            label: format!("{minutes} min"),
            value: json!(minutes),
        },
        QuickAction {
            key: QuickActionKind::Focus,
            label: capitalize(focus),
            value: json!(focus),
        },
        QuickAction {
            key: QuickActionKind::Equipment,
            label: capitalize(&equipment.join(", ")),
            value: json!(equipment),
        },
        QuickAction {
            key: QuickActionKind::Energy,
            label: capitalize(energy.as_str()),
            value: json!(energy),
        },
        QuickAction {
            key: QuickActionKind::Backfill,
            label: "Log a past workout".to_owned(),
            value: Value::Null,
        },
    ]
}

fn offline_hint(plan: Option<&TodayPlan>) -> OfflineHint {
    match plan {
        Some(_) => OfflineHint {
            offline_ready: true,
            message: "Today's plan is saved on this device and works offline.".to_owned(),
        },
        None => OfflineHint {
            offline_ready: false,
            message: "Generate a plan while online to train offline.".to_owned(),
        },
    }
}

/// Snapshot for one device
pub async fn build_snapshot(
    generation: &dyn GenerationStore,
    sessions: &dyn SessionStore,
    device_token: &str,
) -> Snapshot {
    let state = generation.get_state(device_token).await;
    let mut recent_sessions = sessions.recent_sessions(device_token).await;
    recent_sessions.truncate(defaults::SNAPSHOT_RECENT_SESSIONS);

    Snapshot {
        quick_actions: quick_actions(state.plan.as_ref()),
        offline_hint: offline_hint(state.plan.as_ref()),
        recent_sessions,
        generation_status: state.generation_status,
        plan: state.plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quick_actions() {
        let actions = quick_actions(None);
        let keys: Vec<QuickActionKind> = actions.iter().map(|a| a.key).collect();
        assert_eq!(
            keys,
            vec![
                QuickActionKind::Time,
                QuickActionKind::Focus,
                QuickActionKind::Equipment,
                QuickActionKind::Energy,
                QuickActionKind::Backfill,
            ]
        );
        assert_eq!(actions[0].value, json!(30));
        assert_eq!(actions[1].value, json!("full body"));
        assert_eq!(actions[2].value, json!(["bodyweight"]));
        assert_eq!(actions[3].value, json!("moderate"));
        assert_eq!(actions[4].value, Value::Null);
        assert_eq!(actions[1].label, "Full body");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("upper body"), "Upper body");
    }
}
