// ABOUTME: Core types and constants for the workout plan generation service
// ABOUTME: Foundation crate with error handling, plan and session models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Core
//!
//! Foundation crate providing shared types and constants for the workout plan
//! generation service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: API-level `AppError`/`ErrorCode` and adapter-level `ProviderError`
//! - **models**: Generation requests, loose and canonical plans, sessions, device state
//! - **constants**: Defaults shared by the server and its collaborators

/// Unified error handling with wire error codes and HTTP responses
pub mod errors;

/// Application constants and default values
pub mod constants;

/// Core data models (plans, sessions, generation state)
pub mod models;
