// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Environment-driven server config plus the typed enums it is built from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the workout planner server
//!
//! - **Environment**: [`ServerConfig`] loaded from environment variables
//! - **Types**: [`Environment`], [`DeploymentEdition`], [`ProviderKind`]

/// Environment and server configuration
pub mod environment;
/// Core configuration type definitions
pub mod types;

pub use environment::{ProviderSettings, ServerConfig, VertexSettings};
pub use types::{DeploymentEdition, Environment, ProviderKind};
