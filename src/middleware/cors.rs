// ABOUTME: CORS layer for the planner's HTTP endpoints
// ABOUTME: Origins come from CORS_ALLOWED_ORIGINS; provider key headers are allowed through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use workout_core::constants::headers;

use crate::config::ServerConfig;

fn allowed_origins(raw: &str) -> AllowOrigin {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return AllowOrigin::any();
    }
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    }
}

/// CORS layer for the configured origins
///
/// # Examples
///
/// ```bash
/// # Any origin (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Fixed list (production)
/// export CORS_ALLOWED_ORIGINS="https://app.example.com,https://beta.example.com"
/// ```
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.cors_allowed_origins))
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static(headers::AI_PROVIDER),
            HeaderName::from_static(headers::OPENAI_KEY),
            HeaderName::from_static(headers::GEMINI_KEY),
            HeaderName::from_static(headers::AI_KEY),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

