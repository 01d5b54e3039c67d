// ABOUTME: Error types re-exported from the workout-core foundation crate
// ABOUTME: AppError and ErrorCode for the HTTP surface, ProviderError for adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! The error taxonomy lives in `workout-core` so the models and stores can use
//! it without depending on axum. `AppError` renders as
//! `{code, message, retryAfter?}` with its HTTP status.

pub use workout_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ProviderError};
