// ABOUTME: Snapshot route: GET /snapshot returns the device's plan, presets, and history
// ABOUTME: Authenticated with the same device auth as generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use workout_core::errors::AppError;

use super::authenticate;
use crate::handlers::{build_snapshot, Snapshot};
use crate::resources::ServerResources;

/// Snapshot routes
pub struct SnapshotRoutes;

impl SnapshotRoutes {
    /// Create the snapshot route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/snapshot", get(Self::handle_snapshot))
            .with_state(resources)
    }

    async fn handle_snapshot(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<Snapshot>, AppError> {
        let device = authenticate(&headers, &resources).await?;
        let snapshot = build_snapshot(
            resources.generation_store.as_ref(),
            resources.session_store.as_ref(),
            &device.device_token,
        )
        .await;
        Ok(Json(snapshot))
    }
}
