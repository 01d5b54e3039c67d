// ABOUTME: Unified error handling with wire error codes and HTTP status mapping
// ABOUTME: Defines AppError for the API surface and ProviderError for LLM adapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Two layers of errors exist:
//!
//! - [`AppError`] is what the HTTP surface returns. It carries an [`ErrorCode`]
//!   whose wire name is part of the public contract (`UNAUTHORIZED`,
//!   `VALIDATION_ERROR`, `BYOK_REQUIRED`, `QUOTA_EXCEEDED`, `INVALID_PROVIDER`).
//! - [`ProviderError`] is what LLM adapters return. The orchestrator never
//!   surfaces it to callers; provider failures are recovered with a fallback plan.

mod provider;

pub use provider::ProviderError;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes exposed in API error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid bearer credential
    Unauthorized,
    /// Malformed JSON or request schema violation
    ValidationError,
    /// Edition requires a caller-supplied provider key and none was usable
    ByokRequired,
    /// Usage policy denied the generation
    QuotaExceeded,
    /// Unknown or unregistered provider name
    InvalidProvider,
    /// Requested resource does not exist
    NotFound,
    /// Server configuration problem
    ConfigError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Default HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::ValidationError | Self::InvalidProvider => 400,
            Self::Unauthorized => 401,
            Self::ByokRequired => 402,
            Self::NotFound => 404,
            Self::QuotaExceeded => 429,
            Self::ConfigError | Self::InternalError => 500,
        }
    }

    /// Wire representation of the code
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ByokRequired => "BYOK_REQUIRED",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::InvalidProvider => "INVALID_PROVIDER",
            Self::NotFound => "NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the API surface
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Status to use instead of the code's default (policy denials carry their own)
    pub status_override: Option<u16>,
    /// Seconds the caller should wait before retrying
    pub retry_after: Option<u64>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status_override: None,
            retry_after: None,
        }
    }

    /// Override the HTTP status derived from the error code
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status_override = Some(status);
        self
    }

    /// Attach a retry hint in seconds
    #[must_use]
    pub const fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Effective HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.status_override
            .unwrap_or_else(|| self.code.http_status())
    }

    /// Missing or invalid bearer credential
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            "A valid bearer device token is required",
        )
    }

    /// Request body failed parsing or validation
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// No usable credential for a provider in an edition that requires one
    #[must_use]
    pub fn byok_required(provider: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ByokRequired,
            format!("An API key for provider '{provider}' is required to generate a plan"),
        )
    }

    /// Usage policy denial
    #[must_use]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::QuotaExceeded, message)
    }

    /// Unknown provider name
    #[must_use]
    pub fn invalid_provider(name: &str) -> Self {
        Self::new(
            ErrorCode::InvalidProvider,
            format!("Unsupported AI provider '{name}'"),
        )
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error body: `{code, message, retryAfter?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Wire error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Retry hint in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.code,
            message: error.message.clone(),
            retry_after: error.retry_after,
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::header::RETRY_AFTER;
    use http::{HeaderValue, StatusCode};

    use super::{AppError, ErrorResponse};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = ErrorResponse::from(&self);
            let mut response = (status, Json(body)).into_response();
            if let Some(seconds) = self.retry_after {
                if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                    response.headers_mut().insert(RETRY_AFTER, value);
                }
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::Unauthorized.http_status(), 401);
        assert_eq!(ErrorCode::ValidationError.http_status(), 400);
        assert_eq!(ErrorCode::ByokRequired.http_status(), 402);
        assert_eq!(ErrorCode::QuotaExceeded.http_status(), 429);
        assert_eq!(ErrorCode::InvalidProvider.http_status(), 400);
    }

    #[test]
    fn test_status_override_wins() {
        let error = AppError::quota_exceeded("daily limit").with_status(403);
        assert_eq!(error.http_status(), 403);
        assert_eq!(AppError::quota_exceeded("x").http_status(), 429);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::byok_required("openai").with_retry_after(30);
        let json = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
        assert_eq!(json["code"], "BYOK_REQUIRED");
        assert_eq!(json["retryAfter"], 30);
        assert!(json["message"].as_str().unwrap().contains("openai"));

        let plain = serde_json::to_value(ErrorResponse::from(&AppError::unauthorized())).unwrap();
        assert!(plain.get("retryAfter").is_none());
    }
}
