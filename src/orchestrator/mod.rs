// ABOUTME: Generate orchestrator wiring auth, provider and key resolution, policy, adapters, and stores
// ABOUTME: Provider failures are recovered with an unpersisted fallback plan; the stored plan survives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generate Orchestrator
//!
//! One call to [`GenerateOrchestrator::generate`] runs the whole "generate a
//! plan" operation:
//!
//! 1. Authenticate the device (401)
//! 2. Parse the body, optionally carrying a client context (400)
//! 3. Resolve the provider (400 `INVALID_PROVIDER`)
//! 4. Resolve a credential: BYOK, server-managed, or ambient
//! 5. Refuse without a credential when the edition requires one (402)
//! 6. Run the usage policy (429 unless the policy says otherwise)
//! 7. Load the context with request overrides layered on top
//! 8. Mark the device pending before any network I/O
//! 9. Call the adapter, persist its plan, and meter the call
//! 10. On adapter failure record the error, keep the stored plan, and return
//!     a fallback plan that is **not** persisted
//! 11. Without any credential in the open edition, persist and return the
//!     fallback plan as the device's plan

mod collaborators;
mod credentials;
mod fallback;

pub use collaborators::{
    bearer_token, AllowAllPolicy, AuthProvider, AuthenticatedDevice, BearerDeviceAuth,
    ClientContextSupplier, ContextSupplier, MeteringSink, PolicyDecision, TracingMeteringSink,
    UsageEvent, UsagePolicy,
};
pub use credentials::{resolve_credential, resolve_provider, CredentialSource, ResolvedCredential};
pub use fallback::{build_fallback_plan, fallback_today_plan};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use http::HeaderMap;
use serde::Deserialize;
use tracing::field::Empty;
use tracing::{debug, info, instrument, warn, Span};
use workout_core::errors::{AppError, AppResult};
use workout_core::models::{
    GenerationContext, GenerationRequest, TodayPlan, TransformationMetadata,
};

use crate::config::ServerConfig;
use crate::llm::ProviderRegistry;
use crate::middleware::redaction::{fingerprint_token, redact_headers, redact_provider_keys};
use crate::stores::{GenerationStore, SessionStore};
use crate::transform::SchemaTransformer;

/// Longest accepted workout
pub const MAX_TIME_MINUTES: u32 = 240;

/// Longest accepted free-form notes, in characters
pub const MAX_NOTES_CHARS: usize = 2000;

/// Generate request body: a generation request plus an optional client context
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    /// Generation request fields
    #[serde(flatten)]
    pub request: GenerationRequest,
    /// Context the client already holds locally
    #[serde(default)]
    pub context: Option<GenerationContext>,
}

impl GenerateBody {
    /// Parse raw body bytes; an empty body is an empty request
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` for malformed JSON or out-of-range values.
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let body: Self = serde_json::from_slice(bytes)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;
        body.validate()?;
        Ok(body)
    }

    fn validate(&self) -> AppResult<()> {
        let request = &self.request;
        check_minutes("timeMinutes", request.time_minutes)?;
        if let Some(context) = &self.context {
            check_minutes(
                "context.environment.timeMinutes",
                context.environment.time_minutes,
            )?;
        }
        if let Some(equipment) = &request.equipment {
            if equipment.iter().any(|item| item.trim().is_empty()) {
                return Err(AppError::validation("equipment entries must not be empty"));
            }
        }
        if let Some(notes) = &request.notes {
            if notes.chars().count() > MAX_NOTES_CHARS {
                return Err(AppError::validation(format!(
                    "notes must be at most {MAX_NOTES_CHARS} characters"
                )));
            }
        }
        Ok(())
    }
}

fn check_minutes(field: &str, minutes: Option<u32>) -> AppResult<()> {
    match minutes {
        Some(minutes) if minutes == 0 || minutes > MAX_TIME_MINUTES => Err(AppError::validation(
            format!("{field} must be between 1 and {MAX_TIME_MINUTES}"),
        )),
        _ => Ok(()),
    }
}

/// End-to-end "generate a plan" pipeline
pub struct GenerateOrchestrator {
    config: Arc<ServerConfig>,
    registry: Arc<ProviderRegistry>,
    transformer: Arc<SchemaTransformer>,
    generation_store: Arc<dyn GenerationStore>,
    auth: Arc<dyn AuthProvider>,
    policy: Arc<dyn UsagePolicy>,
    metering: Arc<dyn MeteringSink>,
    context_supplier: Arc<dyn ContextSupplier>,
}

impl GenerateOrchestrator {
    /// Orchestrator with the default collaborators
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        registry: Arc<ProviderRegistry>,
        transformer: Arc<SchemaTransformer>,
        generation_store: Arc<dyn GenerationStore>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            registry,
            transformer,
            generation_store,
            auth: Arc::new(BearerDeviceAuth),
            policy: Arc::new(AllowAllPolicy),
            metering: Arc::new(TracingMeteringSink),
            context_supplier: Arc::new(ClientContextSupplier::new(session_store)),
        }
    }

    /// Replace the auth provider
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = auth;
        self
    }

    /// Replace the usage policy
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn UsagePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the metering sink
    #[must_use]
    pub fn with_metering(mut self, metering: Arc<dyn MeteringSink>) -> Self {
        self.metering = metering;
        self
    }

    /// Replace the context supplier
    #[must_use]
    pub fn with_context_supplier(mut self, supplier: Arc<dyn ContextSupplier>) -> Self {
        self.context_supplier = supplier;
        self
    }

    /// Auth provider shared with the other device-scoped routes
    #[must_use]
    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::clone(&self.auth)
    }

    /// Run the generate pipeline
    ///
    /// # Errors
    ///
    /// `UNAUTHORIZED`, `VALIDATION_ERROR`, `INVALID_PROVIDER`, `BYOK_REQUIRED`,
    /// or `QUOTA_EXCEEDED`. Provider failures are never surfaced as errors.
    #[instrument(skip_all, fields(device = Empty, provider = Empty))]
    pub async fn generate(&self, headers: &HeaderMap, body: &[u8]) -> AppResult<TodayPlan> {
        debug!(
            headers = ?redact_headers(
                headers
                    .iter()
                    .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            ),
            body_bytes = body.len(),
            "Generate request received"
        );
        let device = self
            .auth
            .authenticate(headers)
            .await
            .ok_or_else(AppError::unauthorized)?;
        let span = Span::current();
        span.record("device", fingerprint_token(&device.device_token).as_str());

        let GenerateBody {
            request,
            context: client_context,
        } = GenerateBody::parse(body)?;

        let kind = resolve_provider(headers, &self.registry)?;
        span.record("provider", kind.as_str());
        let provider = self
            .registry
            .get(kind)
            .ok_or_else(|| AppError::invalid_provider(kind.as_str()))?;

        let credential =
            resolve_credential(headers, kind, &self.config, provider.capabilities());
        if credential.is_none() && self.config.edition.requires_credential() {
            return Err(AppError::byok_required(kind));
        }

        if let PolicyDecision::Deny {
            status,
            reason,
            retry_after,
        } = self.policy.can_generate(&device.user_id, &request).await
        {
            warn!(user.id = %device.user_id, reason = %reason, "Generation refused by usage policy");
            let mut error = AppError::quota_exceeded(reason);
            if let Some(status) = status {
                error = error.with_status(status);
            }
            if let Some(seconds) = retry_after {
                error = error.with_retry_after(seconds);
            }
            return Err(error);
        }

        let context = self
            .context_supplier
            .load_context(&device, client_context)
            .await
            .with_request_overrides(&request);

        self.generation_store
            .mark_pending(&device.device_token, self.config.generation_eta_secs)
            .await;

        let Some(credential) = credential else {
            info!("No credential available; serving fallback plan");
            let plan = fallback_today_plan(&self.transformer, &context)?;
            self.generation_store
                .persist_plan(&device.device_token, plan.clone(), None)
                .await;
            return Ok(plan);
        };

        let started = Instant::now();
        match provider
            .generate(&request, &context, &credential.to_options())
            .await
        {
            Ok(generated) => {
                self.generation_store
                    .persist_plan(
                        &device.device_token,
                        generated.plan.clone(),
                        Some(TransformationMetadata::now(generated.schema_version)),
                    )
                    .await;
                self.metering
                    .record_usage(UsageEvent {
                        user_id: device.user_id.clone(),
                        provider: kind,
                        model: generated.model,
                        credential_source: credential.source,
                        schema_version: generated.schema_version,
                        regeneration: request.is_regeneration(),
                        latency_ms: u64::try_from(started.elapsed().as_millis())
                            .unwrap_or(u64::MAX),
                        occurred_at: Utc::now(),
                    })
                    .await;
                Ok(generated.plan)
            }
            Err(error) => {
                let message = redact_provider_keys(&error.to_string());
                warn!(
                    kind = error.kind(),
                    status = ?error.status(),
                    error = %message,
                    "Provider generation failed; serving unpersisted fallback plan"
                );
                self.generation_store
                    .set_error(&device.device_token, &message)
                    .await;
                fallback_today_plan(&self.transformer, &context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_request() {
        let body = GenerateBody::parse(b"  ").unwrap();
        assert_eq!(body.request, GenerationRequest::default());
        assert!(body.context.is_none());
    }

    #[test]
    fn test_body_with_context() {
        let body = GenerateBody::parse(
            br#"{"timeMinutes": 20, "context": {"environment": {"equipment": ["mat"]}}}"#,
        )
        .unwrap();
        assert_eq!(body.request.time_minutes, Some(20));
        assert_eq!(
            body.context.unwrap().environment.equipment,
            vec!["mat".to_owned()]
        );
    }

    #[test]
    fn test_body_validation() {
        assert!(GenerateBody::parse(b"{not json").is_err());
        assert!(GenerateBody::parse(br#"{"timeMinutes": 0}"#).is_err());
        assert!(GenerateBody::parse(br#"{"timeMinutes": 241}"#).is_err());
        assert!(GenerateBody::parse(br#"{"energy": "extreme"}"#).is_err());
        assert!(GenerateBody::parse(br#"{"equipment": [" "]}"#).is_err());
        let long_notes = format!(r#"{{"notes": "{}"}}"#, "a".repeat(MAX_NOTES_CHARS + 1));
        assert!(GenerateBody::parse(long_notes.as_bytes()).is_err());
    }
}
