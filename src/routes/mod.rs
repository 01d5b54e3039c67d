// ABOUTME: Route module organization for the workout planner HTTP endpoints
// ABOUTME: Builds the application router with request tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module holds only route definitions and thin handlers that
//! delegate to the orchestrator or the handler layer.

/// Plan generation
pub mod generate;
/// Health and readiness
pub mod health;
/// Home-screen snapshot
pub mod snapshot;
/// Session logging
pub mod workouts;

pub use generate::GenerateRoutes;
pub use health::HealthRoutes;
pub use snapshot::SnapshotRoutes;
pub use workouts::WorkoutRoutes;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;
use workout_core::errors::{AppError, AppResult};

use crate::middleware::setup_cors;
use crate::orchestrator::AuthenticatedDevice;
use crate::resources::ServerResources;

/// Resolve the calling device or fail with `UNAUTHORIZED`
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthenticatedDevice> {
    resources
        .auth
        .authenticate(headers)
        .await
        .ok_or_else(AppError::unauthorized)
}

/// Full application router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(GenerateRoutes::routes(Arc::clone(resources)))
        .merge(SnapshotRoutes::routes(Arc::clone(resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(resources)))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "http_request",
                    request_id = %format!("req_{}", Uuid::new_v4().simple()),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(cors)
}
