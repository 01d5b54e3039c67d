// ABOUTME: Session log write boundary: validates a completed session and moves state into history
// ABOUTME: Missing fields fall back to the stored plan; logging clears the device's active plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;
use workout_core::constants::sources;
use workout_core::errors::{AppError, AppResult};
use workout_core::models::{
    Load, SessionExercise, SetLog, WeightUnit, WorkoutSession, WorkoutSessionSummary,
};

use crate::middleware::redaction::fingerprint_token;
use crate::stores::{GenerationStore, SessionStore};

/// Logged load; weight and unit must both be present or both absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadBody {
    /// Amount lifted
    #[serde(default)]
    pub weight: Option<f64>,
    /// Unit of `weight`
    #[serde(default)]
    pub unit: Option<WeightUnit>,
}

/// One logged set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSetBody {
    /// Repetitions performed
    #[serde(default)]
    pub reps: Option<u32>,
    /// Load used
    #[serde(default)]
    pub load: Option<LoadBody>,
    /// Rate of perceived exertion
    #[serde(default)]
    pub rpe: Option<f32>,
    /// Whether the set was finished
    #[serde(default)]
    pub completed: bool,
}

/// One logged exercise
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogExerciseBody {
    /// Exercise name
    pub name: String,
    /// Sets in order
    #[serde(default)]
    pub sets: Vec<LogSetBody>,
}

/// Body of `POST /workouts/{id}/log`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSessionBody {
    /// Session name
    #[serde(default)]
    pub name: Option<String>,
    /// Session focus
    #[serde(default)]
    pub focus: Option<String>,
    /// Session length
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// When the session finished, now when absent
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Origin of the session's plan
    #[serde(default)]
    pub source: Option<String>,
    /// Logged exercises
    #[serde(default)]
    pub exercises: Vec<LogExerciseBody>,
}

impl LogSessionBody {
    /// Parse raw body bytes; an empty body logs the stored plan as done
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` for malformed JSON.
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
            .map_err(|e| AppError::validation(format!("Invalid session body: {e}")))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn convert_set(exercise: &str, index: usize, set: &LogSetBody) -> AppResult<SetLog> {
    let load = match &set.load {
        None
        | Some(LoadBody {
            weight: None,
            unit: None,
        }) => None,
        Some(LoadBody {
            weight: Some(weight),
            unit: Some(unit),
        }) => {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(AppError::validation(format!(
                    "{exercise} set {}: load weight must be a non-negative number",
                    index + 1
                )));
            }
            Some(Load {
                weight: *weight,
                unit: *unit,
            })
        }
        Some(_) => {
            return Err(AppError::validation(format!(
                "{exercise} set {}: load needs both weight and unit",
                index + 1
            )))
        }
    };

    if let Some(rpe) = set.rpe {
        if !(1.0..=10.0).contains(&rpe) {
            return Err(AppError::validation(format!(
                "{exercise} set {}: rpe must be between 1 and 10",
                index + 1
            )));
        }
    }

    Ok(SetLog {
        reps: set.reps,
        load,
        rpe: set.rpe,
        completed: set.completed,
    })
}

fn convert_exercises(exercises: &[LogExerciseBody]) -> AppResult<Vec<SessionExercise>> {
    exercises
        .iter()
        .map(|exercise| {
            let name = exercise.name.trim();
            if name.is_empty() {
                return Err(AppError::validation("exercise name must not be empty"));
            }
            let sets = exercise
                .sets
                .iter()
                .enumerate()
                .map(|(index, set)| convert_set(name, index, set))
                .collect::<AppResult<Vec<_>>>()?;
            Ok(SessionExercise {
                name: name.to_owned(),
                sets,
            })
        })
        .collect()
}

/// Start of a session that ended at `completed_at` after `duration_minutes`
#[must_use]
pub fn scheduled_date(completed_at: DateTime<Utc>, duration_minutes: u32) -> DateTime<Utc> {
    completed_at - Duration::milliseconds(i64::from(duration_minutes) * 60_000)
}

/// Persist a completed session and clear the device's active plan
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` when a required field is missing from both the
/// body and the stored plan, or when a set is malformed.
pub async fn log_session(
    generation: &dyn GenerationStore,
    sessions: &dyn SessionStore,
    device_token: &str,
    session_id: &str,
    body: LogSessionBody,
) -> AppResult<WorkoutSessionSummary> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::validation("session id must not be empty"));
    }

    let state = generation.get_state(device_token).await;
    let plan = state.plan.as_ref();

    let focus = non_blank(body.focus.as_deref())
        .or_else(|| plan.map(|p| p.focus.clone()))
        .ok_or_else(|| AppError::validation("focus is required when no plan is stored"))?;
    let name = non_blank(body.name.as_deref())
        .or_else(|| plan.map(|p| format!("{} workout", p.focus)))
        .ok_or_else(|| AppError::validation("name is required when no plan is stored"))?;
    let duration_minutes = body
        .duration_minutes
        .or_else(|| plan.map(|p| p.duration_minutes))
        .ok_or_else(|| {
            AppError::validation("durationMinutes is required when no plan is stored")
        })?;
    if duration_minutes == 0 {
        return Err(AppError::validation("durationMinutes must be positive"));
    }
    let source = non_blank(body.source.as_deref())
        .or_else(|| plan.map(|p| p.source.clone()))
        .unwrap_or_else(|| sources::MANUAL.to_owned());
    let exercises = convert_exercises(&body.exercises)?;

    let completed_at = body.completed_at.unwrap_or_else(Utc::now);
    let session = WorkoutSession {
        summary: WorkoutSessionSummary {
            id: session_id.to_owned(),
            name,
            focus,
            duration_minutes,
            completed_at,
            scheduled_date: scheduled_date(completed_at, duration_minutes),
            source,
        },
        exercises,
    };

    let summary = sessions.persist_logged_session(device_token, session).await;
    generation.clear_plan(device_token).await;

    info!(
        device = %fingerprint_token(device_token),
        session.id = %summary.id,
        duration_minutes = summary.duration_minutes,
        "Workout session logged"
    );
    Ok(summary)
}
