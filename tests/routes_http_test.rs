// ABOUTME: HTTP-level tests for the generate, snapshot, session log, and health routes
// ABOUTME: Drives the full router with oneshot requests and checks wire shapes and error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use common::{create_test_resources, ScriptedProvider, DEVICE_TOKEN};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use workout_planner::config::DeploymentEdition;
use workout_planner::resources::ServerResources;
use workout_planner::routes;
use workout_planner::stores::{GenerationStore, SessionStore};

fn setup(edition: DeploymentEdition) -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources(edition, Arc::new(ScriptedProvider::succeeding()));
    (routes::router(&resources), resources)
}

// ============================================================================
// Generate
// ============================================================================

#[tokio::test]
async fn test_generate_returns_canonical_plan() {
    let (app, _) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::post("/generate")
        .bearer(DEVICE_TOKEN)
        .header("x-openai-key", "sk-user-supplied-key-000000")
        .json(&json!({"timeMinutes": 30, "focus": "upper body"}))
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let plan: Value = response.json();
    assert!(plan["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(plan["durationMinutes"], 30);
    assert_eq!(plan["blocks"].as_array().unwrap().len(), 3);
    assert!(plan["blocks"][1]["exercises"][0]["id"].is_string());
}

#[tokio::test]
async fn test_generate_byok_required_error_body() {
    let (app, _) = setup(DeploymentEdition::Byok);

    let response = AxumTestRequest::post("/generate")
        .bearer(DEVICE_TOKEN)
        .json(&json!({}))
        .send(app)
        .await;

    assert_eq!(response.status(), 402);
    let body: Value = response.json();
    assert_eq!(body["code"], "BYOK_REQUIRED");
    assert!(body["message"].is_string());
    assert!(body.get("retryAfter").is_none());
}

#[tokio::test]
async fn test_generate_without_token_is_401() {
    let (app, _) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::post("/generate")
        .json(&json!({}))
        .send(app)
        .await;

    assert_eq!(response.status(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_generate_malformed_json_is_400() {
    let (app, _) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::post("/generate")
        .bearer(DEVICE_TOKEN)
        .header("content-type", "application/json")
        .raw_body("{\"timeMinutes\": ")
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Snapshot
// ============================================================================

#[tokio::test]
async fn test_snapshot_for_new_device() {
    let (app, _) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::get("/snapshot")
        .bearer(DEVICE_TOKEN)
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let snapshot: Value = response.json();
    assert!(snapshot["plan"].is_null());
    let keys: Vec<&str> = snapshot["quickActions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|action| action["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["time", "focus", "equipment", "energy", "backfill"]);
    assert_eq!(snapshot["quickActions"][0]["value"], 30);
    assert_eq!(snapshot["recentSessions"], json!([]));
    assert_eq!(snapshot["offlineHint"]["offlineReady"], false);
    assert_eq!(snapshot["generationStatus"]["state"], "idle");
}

#[tokio::test]
async fn test_snapshot_reflects_generated_plan() {
    let (app, _) = setup(DeploymentEdition::Open);

    let generated: Value = AxumTestRequest::post("/generate")
        .bearer(DEVICE_TOKEN)
        .header("x-ai-key", "sk-user-supplied-key-000000")
        .json(&json!({}))
        .send(app.clone())
        .await
        .json();

    let snapshot: Value = AxumTestRequest::get("/snapshot")
        .bearer(DEVICE_TOKEN)
        .send(app)
        .await
        .json();

    assert_eq!(snapshot["plan"]["id"], generated["id"]);
    assert_eq!(snapshot["offlineHint"]["offlineReady"], true);
    assert_eq!(snapshot["quickActions"][1]["value"], "upper body");
    assert_eq!(snapshot["quickActions"][2]["value"], json!(["dumbbells"]));
}

#[tokio::test]
async fn test_snapshot_requires_token() {
    let (app, _) = setup(DeploymentEdition::Open);
    let response = AxumTestRequest::get("/snapshot").send(app).await;
    assert_eq!(response.status(), 401);
}

// ============================================================================
// Session log
// ============================================================================

#[tokio::test]
async fn test_log_backdated_session_sets_scheduled_date() {
    let (app, resources) = setup(DeploymentEdition::Open);
    let completed_at = Utc::now() - Duration::hours(2);

    let response = AxumTestRequest::post("/workouts/session-1/log")
        .bearer(DEVICE_TOKEN)
        .json(&json!({
            "name": "Evening lift",
            "focus": "lower body",
            "durationMinutes": 45,
            "completedAt": completed_at.to_rfc3339(),
            "exercises": [{
                "name": "Goblet squat",
                "sets": [
                    {"reps": 10, "load": {"weight": 20.0, "unit": "kg"}, "rpe": 7, "completed": true},
                    {"reps": 8, "completed": true}
                ]
            }]
        }))
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["id"], "session-1");
    assert_eq!(summary["source"], "manual");

    let completed: DateTime<Utc> = summary["completedAt"].as_str().unwrap().parse().unwrap();
    let scheduled: DateTime<Utc> = summary["scheduledDate"].as_str().unwrap().parse().unwrap();
    assert_eq!(completed - scheduled, Duration::milliseconds(45 * 60_000));

    let history = resources.session_store.history(DEVICE_TOKEN).await;
    assert_eq!(history.summaries.len(), 1);
    let latest = history.latest.unwrap();
    assert_eq!(latest.exercises[0].sets.len(), 2);
    assert!((latest.exercises[0].sets[0].load.unwrap().weight - 20.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_log_falls_back_to_stored_plan_and_clears_it() {
    let (app, resources) = setup(DeploymentEdition::Open);

    AxumTestRequest::post("/generate")
        .bearer(DEVICE_TOKEN)
        .header("x-ai-key", "sk-user-supplied-key-000000")
        .json(&json!({}))
        .send(app.clone())
        .await;

    let response = AxumTestRequest::post("/workouts/plan-done/log")
        .bearer(DEVICE_TOKEN)
        .json(&json!({}))
        .send(app.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["focus"], "upper body");
    assert_eq!(summary["durationMinutes"], 30);
    assert_eq!(summary["source"], "ai");

    let state = resources.generation_store.get_state(DEVICE_TOKEN).await;
    assert!(state.plan.is_none());

    let snapshot: Value = AxumTestRequest::get("/snapshot")
        .bearer(DEVICE_TOKEN)
        .send(app)
        .await
        .json();
    assert_eq!(snapshot["recentSessions"][0]["id"], "plan-done");
    assert_eq!(snapshot["offlineHint"]["offlineReady"], false);
}

#[tokio::test]
async fn test_log_without_plan_or_fields_is_400() {
    let (app, _) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::post("/workouts/s1/log")
        .bearer(DEVICE_TOKEN)
        .json(&json!({"name": "Quick one"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_log_half_specified_load_is_400() {
    let (app, resources) = setup(DeploymentEdition::Open);

    let response = AxumTestRequest::post("/workouts/s1/log")
        .bearer(DEVICE_TOKEN)
        .json(&json!({
            "name": "Lift",
            "focus": "full body",
            "durationMinutes": 30,
            "exercises": [{"name": "Row", "sets": [{"reps": 8, "load": {"weight": 12.5}, "completed": true}]}]
        }))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    assert!(resources
        .session_store
        .recent_sessions(DEVICE_TOKEN)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_snapshot_lists_at_most_three_sessions() {
    let (app, _) = setup(DeploymentEdition::Open);

    for index in 0..5 {
        let response = AxumTestRequest::post(&format!("/workouts/s{index}/log"))
            .bearer(DEVICE_TOKEN)
            .json(&json!({"name": "Lift", "focus": "full body", "durationMinutes": 20}))
            .send(app.clone())
            .await;
        assert_eq!(response.status(), 200);
    }

    let snapshot: Value = AxumTestRequest::get("/snapshot")
        .bearer(DEVICE_TOKEN)
        .send(app)
        .await
        .json();
    let ids: Vec<&str> = snapshot["recentSessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["s4", "s3", "s2"]);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _) = setup(DeploymentEdition::Open);

    let health: Value = AxumTestRequest::get("/health").send(app.clone()).await.json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "workout-planner");

    let ready: Value = AxumTestRequest::get("/ready").send(app).await.json();
    assert_eq!(ready["status"], "ready");
    assert_eq!(ready["providers"], json!(["openai"]));
    assert_eq!(ready["edition"], "open");
}
