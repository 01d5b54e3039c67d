// ABOUTME: Workout log route: POST /workouts/{id}/log records a completed session
// ABOUTME: Returns the stored summary; the device's active plan is cleared
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use workout_core::errors::AppError;

use super::authenticate;
use crate::handlers::{log_session, LogSessionBody};
use crate::resources::ServerResources;

/// Workout session routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the session log route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts/:id/log", post(Self::handle_log))
            .with_state(resources)
    }

    async fn handle_log(
        State(resources): State<Arc<ServerResources>>,
        Path(session_id): Path<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let device = authenticate(&headers, &resources).await?;
        let body = LogSessionBody::parse(&body)?;
        let summary = log_session(
            resources.generation_store.as_ref(),
            resources.session_store.as_ref(),
            &device.device_token,
            &session_id,
            body,
        )
        .await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}
