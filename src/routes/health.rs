// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness reports the service version; readiness lists the registered providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes
//!
//! Unauthenticated endpoints for load balancers and container probes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::logging::SERVICE_NAME;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let providers: Vec<&str> = resources
            .registry
            .kinds()
            .into_iter()
            .map(|kind| kind.as_str())
            .collect();
        Json(json!({
            "status": "ready",
            "edition": resources.config.edition.to_string(),
            "defaultProvider": resources.registry.default_kind().as_str(),
            "providers": providers,
            "timestamp": Utc::now().to_rfc3339()
        }))
    }
}
