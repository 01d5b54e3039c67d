// ABOUTME: Collaborator contracts the generate pipeline depends on, with default implementations
// ABOUTME: Device authentication, usage policy, usage metering, and generation context supply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Each collaborator is injected into the orchestrator as a trait object so a
//! deployment can plug in real auth, quota, billing, and profile services.
//! The defaults here are enough to run the server standalone.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use workout_core::models::{GenerationContext, GenerationRequest, SchemaVersion};

use super::credentials::CredentialSource;
use crate::config::ProviderKind;
use crate::middleware::redaction::fingerprint_token;
use crate::stores::SessionStore;

// ============================================================================
// Authentication
// ============================================================================

/// Identity of an authenticated client installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedDevice {
    /// Stable user identifier
    pub user_id: String,
    /// Device token partitioning all per-device state
    pub device_token: String,
}

/// Black-box credential validation
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate a request from its headers; `None` means unauthorized
    async fn authenticate(&self, headers: &HeaderMap) -> Option<AuthenticatedDevice>;
}

/// Accepts any non-empty bearer token as a device token
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerDeviceAuth;

impl BearerDeviceAuth {
    /// Stable user id derived from a device token
    #[must_use]
    pub fn user_id_for(device_token: &str) -> String {
        let digest = Sha256::digest(device_token.as_bytes());
        format!("device-{}", hex::encode(&digest[..8]))
    }
}

/// Bearer token from an `Authorization` header
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl AuthProvider for BearerDeviceAuth {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<AuthenticatedDevice> {
        let token = bearer_token(headers)?;
        Some(AuthenticatedDevice {
            user_id: Self::user_id_for(token),
            device_token: token.to_owned(),
        })
    }
}

// ============================================================================
// Usage policy
// ============================================================================

/// Outcome of a policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Generation may proceed
    Allow,
    /// Generation is refused
    Deny {
        /// HTTP status to surface, 429 when unset
        status: Option<u16>,
        /// Reason shown to the caller
        reason: String,
        /// Retry hint in seconds
        retry_after: Option<u64>,
    },
}

impl PolicyDecision {
    /// Denial with the default status
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            status: None,
            reason: reason.into(),
            retry_after: None,
        }
    }
}

/// Quota or entitlement check run before every generation
#[async_trait]
pub trait UsagePolicy: Send + Sync {
    /// Decide whether `user_id` may generate now
    async fn can_generate(&self, user_id: &str, request: &GenerationRequest) -> PolicyDecision;
}

/// Policy that never refuses
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

#[async_trait]
impl UsagePolicy for AllowAllPolicy {
    async fn can_generate(&self, _user_id: &str, _request: &GenerationRequest) -> PolicyDecision {
        PolicyDecision::Allow
    }
}

// ============================================================================
// Metering
// ============================================================================

/// One successful provider generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// User the generation is billed to
    pub user_id: String,
    /// Provider that produced the plan
    pub provider: ProviderKind,
    /// Model that produced the plan
    pub model: String,
    /// Where the credential came from
    pub credential_source: CredentialSource,
    /// Schema version the provider followed
    pub schema_version: SchemaVersion,
    /// Whether this was a regeneration
    pub regeneration: bool,
    /// Provider call latency
    pub latency_ms: u64,
    /// When the generation completed
    pub occurred_at: DateTime<Utc>,
}

/// Receives usage events
#[async_trait]
pub trait MeteringSink: Send + Sync {
    /// Record a successful generation
    async fn record_usage(&self, event: UsageEvent);
}

/// Metering sink that writes events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMeteringSink;

#[async_trait]
impl MeteringSink for TracingMeteringSink {
    async fn record_usage(&self, event: UsageEvent) {
        info!(
            user.id = %event.user_id,
            provider = %event.provider,
            model = %event.model,
            credential_source = ?event.credential_source,
            schema_version = %event.schema_version,
            regeneration = event.regeneration,
            latency_ms = event.latency_ms,
            "Usage recorded"
        );
    }
}

// ============================================================================
// Context supply
// ============================================================================

/// Loads the generation context for a device
#[async_trait]
pub trait ContextSupplier: Send + Sync {
    /// Context for this device, starting from what the client sent
    async fn load_context(
        &self,
        device: &AuthenticatedDevice,
        client_context: Option<GenerationContext>,
    ) -> GenerationContext;
}

/// Uses the client-supplied context, filling recent sessions from the session store
pub struct ClientContextSupplier {
    sessions: Arc<dyn SessionStore>,
}

impl ClientContextSupplier {
    /// Supplier backed by a session store
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl ContextSupplier for ClientContextSupplier {
    async fn load_context(
        &self,
        device: &AuthenticatedDevice,
        client_context: Option<GenerationContext>,
    ) -> GenerationContext {
        let mut context = client_context.unwrap_or_default();
        if context.recent_sessions.is_empty() {
            context.recent_sessions = self.sessions.recent_sessions(&device.device_token).await;
            if !context.recent_sessions.is_empty() {
                debug!(
                    device = %fingerprint_token(&device.device_token),
                    sessions = context.recent_sessions.len(),
                    "Filled recent sessions from history"
                );
            }
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer device-123"));
        assert_eq!(bearer_token(&headers), Some("device-123"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(bearer_token(&headers).is_none());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_user_id_is_stable() {
        let a = BearerDeviceAuth::user_id_for("token-a");
        assert_eq!(a, BearerDeviceAuth::user_id_for("token-a"));
        assert_ne!(a, BearerDeviceAuth::user_id_for("token-b"));
        assert!(!a.contains("token-a"));
    }
}
