// ABOUTME: Adapter-level error taxonomy for LLM provider calls
// ABOUTME: Distinguishes missing credentials, transport failures, and unusable payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Error returned by a provider adapter
///
/// Adapters never let raw transport or parse errors escape; everything is
/// folded into one of these three kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API key was supplied and the adapter is not in an ambient-credential mode
    #[error("{provider}: no API key configured")]
    NoApiKey {
        /// Provider name
        provider: String,
    },

    /// The HTTP call failed or the provider answered with a non-success status
    #[error("{provider}: request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RequestFailed {
        /// Provider name
        provider: String,
        /// Upstream HTTP status, when one was received
        status: Option<u16>,
        /// Failure detail
        message: String,
    },

    /// The provider answered but the payload was empty, unparseable, or failed validation
    #[error("{provider}: invalid response: {message}")]
    InvalidResponse {
        /// Provider name
        provider: String,
        /// Failure detail
        message: String,
    },
}

impl ProviderError {
    /// Stable error kind string
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoApiKey { .. } => "NO_API_KEY",
            Self::RequestFailed { .. } => "REQUEST_FAILED",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
        }
    }

    /// Upstream HTTP status if the failure carried one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            Self::NoApiKey { .. } | Self::InvalidResponse { .. } => None,
        }
    }

    /// Missing credential
    #[must_use]
    pub fn no_api_key(provider: impl Into<String>) -> Self {
        Self::NoApiKey {
            provider: provider.into(),
        }
    }

    /// Transport or upstream status failure
    #[must_use]
    pub fn request_failed(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RequestFailed {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Empty, unparseable, or schema-invalid payload
    #[must_use]
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_status() {
        assert_eq!(ProviderError::no_api_key("openai").kind(), "NO_API_KEY");
        let failed = ProviderError::request_failed("gemini", Some(503), "unavailable");
        assert_eq!(failed.kind(), "REQUEST_FAILED");
        assert_eq!(failed.status(), Some(503));
        assert_eq!(failed.to_string(), "gemini: request failed (503): unavailable");
        let invalid = ProviderError::invalid_response("openai", "empty output");
        assert_eq!(invalid.kind(), "INVALID_RESPONSE");
        assert_eq!(invalid.status(), None);
    }

    #[test]
    fn test_request_failed_without_status() {
        let failed = ProviderError::request_failed("openai", None, "connection reset");
        assert_eq!(failed.to_string(), "openai: request failed: connection reset");
    }
}
