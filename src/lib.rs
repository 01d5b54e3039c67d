// ABOUTME: Main library entry point for the workout plan generation service
// ABOUTME: Orchestrates pluggable LLM providers, schema transformation, and per-device state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Workout Planner
//!
//! An HTTP service that turns a short request ("30 minutes, upper body,
//! dumbbells") plus the user's recent history into a structured workout plan
//! using a pluggable LLM provider.
//!
//! ## Features
//!
//! - **Multiple providers**: `OpenAI`, Gemini (API key or Vertex AI), and any
//!   `OpenAI`-compatible endpoint, selected per request
//! - **Bring-your-own-key**: callers may supply their own provider key
//! - **Versioned output schemas**: nested and flat structured-output contracts
//!   normalized into one canonical plan
//! - **Always a plan**: provider failures fall back to a locally built plan
//!
//! ## Architecture
//!
//! - **`llm`**: provider adapters, registry, prompts, output schemas
//! - **`transform`**: schema transformer and version selection
//! - **`stores`**: per-device generation state and session history
//! - **`orchestrator`**: the generate pipeline and its collaborators
//! - **`handlers`** / **`routes`**: snapshot, session logging, HTTP surface
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_planner::config::ServerConfig;
//! use workout_planner::resources::ServerResources;
//! use workout_planner::routes;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let resources = Arc::new(ServerResources::from_config(Arc::new(config))?);
//! let _app = routes::router(&resources);
//! # Ok(())
//! # }
//! ```

/// Environment-driven configuration
pub mod config;

/// Error types re-exported from the core crate
pub mod errors;

/// Snapshot and session-log boundaries
pub mod handlers;

/// LLM provider adapters, prompts, and output schemas
pub mod llm;

/// Structured logging setup
pub mod logging;

/// CORS and redaction helpers
pub mod middleware;

/// Generate pipeline and collaborator traits
pub mod orchestrator;

/// Shared resource container
pub mod resources;

/// HTTP routes
pub mod routes;

/// Per-device generation and session stores
pub mod stores;

/// Schema transformer and version selection
pub mod transform;
