// ABOUTME: Generate route: POST /generate runs the orchestrator and returns the canonical plan
// ABOUTME: The raw body is handed to the orchestrator so parse failures use the structured error body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use workout_core::errors::AppError;
use workout_core::models::TodayPlan;

use crate::resources::ServerResources;

/// Plan generation routes
pub struct GenerateRoutes;

impl GenerateRoutes {
    /// Create the generate route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/generate", post(Self::handle_generate))
            .with_state(resources)
    }

    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Json<TodayPlan>, AppError> {
        let plan = resources.orchestrator.generate(&headers, &body).await?;
        Ok(Json(plan))
    }
}
