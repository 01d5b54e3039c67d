// ABOUTME: LLM provider abstraction layer for structured workout plan generation
// ABOUTME: Defines the PlanProvider contract, capability flags, and shared adapter plumbing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Provider Interface
//!
//! Each LLM vendor is one adapter implementing [`PlanProvider`]. Adapters turn
//! a `(GenerationRequest, GenerationContext, GenerationOptions)` tuple into a
//! canonical plan, or a typed [`ProviderError`]; no raw transport or parse
//! error ever escapes an adapter.
//!
//! ## Key Concepts
//!
//! - **`ProviderCapabilities`**: bitflags describing structured output,
//!   ambient credentials, and server-side response chaining
//! - **`GenerationOptions`**: per-call credential and overrides
//! - **`ProviderRegistry`**: closed set of adapters keyed by [`ProviderKind`]

mod gemini;
mod openai;
mod openai_compatible;
pub mod prompts;
mod registry;
pub mod schemas;
pub mod vertex;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use registry::ProviderRegistry;
pub use vertex::{GcpAuth, VertexTarget};

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use workout_core::errors::{AppError, ProviderError};
use workout_core::models::{GenerationContext, GenerationRequest, SchemaVersion, TodayPlan};

use crate::config::ProviderKind;
use crate::middleware::redaction::redact_provider_keys;
use crate::transform::{SchemaSelector, SchemaTransformer, TransformOutcome};

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// Provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProviderCapabilities: u8 {
        /// Provider enforces a JSON schema on its output
        const STRUCTURED_OUTPUT = 0b0000_0001;
        /// Provider can authenticate without an explicit key (workload identity)
        const AMBIENT_CREDENTIALS = 0b0000_0010;
        /// Provider keeps prior turns server-side, keyed by response id
        const RESPONSE_CHAINING = 0b0000_0100;
    }
}

impl ProviderCapabilities {
    /// Check if ambient credentials are supported
    #[must_use]
    pub const fn supports_ambient_credentials(&self) -> bool {
        self.contains(Self::AMBIENT_CREDENTIALS)
    }

    /// Check if response chaining is supported
    #[must_use]
    pub const fn supports_response_chaining(&self) -> bool {
        self.contains(Self::RESPONSE_CHAINING)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a generation conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Per-call options resolved by the orchestrator
#[derive(Clone, Default)]
pub struct GenerationOptions {
    /// Explicit API key (BYOK or server-managed)
    pub api_key: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Base URL override
    pub api_base_url: Option<String>,
    /// Use ambient credentials (Vertex AI) instead of a key
    pub use_vertex_ai: bool,
    /// Caller-forced schema version
    pub schema_version: Option<SchemaVersion>,
}

impl GenerationOptions {
    /// Options carrying an explicit key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Options using ambient credentials
    #[must_use]
    pub fn ambient() -> Self {
        Self {
            use_vertex_ai: true,
            ..Self::default()
        }
    }

    /// Non-empty explicit key, if any
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Debug for GenerationOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GenerationOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("use_vertex_ai", &self.use_vertex_ai)
            .field("schema_version", &self.schema_version)
            .finish()
    }
}

/// Successful adapter result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    /// Canonical plan
    pub plan: TodayPlan,
    /// Provider response id, used for regeneration chaining
    pub response_id: Option<String>,
    /// Schema version the provider followed
    pub schema_version: SchemaVersion,
    /// Model that produced the plan
    pub model: String,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Adapter contract for one LLM vendor
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Which vendor this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> ProviderCapabilities;

    /// Schema versions this provider can be asked to follow
    fn supported_schema_versions(&self) -> &[SchemaVersion];

    /// Model used when the options carry no override
    fn default_model(&self) -> &str;

    /// Generate a canonical plan
    ///
    /// # Errors
    ///
    /// - `NO_API_KEY` when no key is given and ambient credentials are not in use
    /// - `REQUEST_FAILED` for transport failures and non-success statuses
    /// - `INVALID_RESPONSE` for empty, unparseable, or schema-violating output
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        options: &GenerationOptions,
    ) -> Result<GeneratedPlan, ProviderError>;
}

// ============================================================================
// Shared adapter plumbing
// ============================================================================

/// Schema handling shared by every adapter
#[derive(Debug, Clone, Default)]
pub struct SchemaPipeline {
    /// Version registry
    pub transformer: Arc<SchemaTransformer>,
    /// Version selection
    pub selector: SchemaSelector,
}

impl SchemaPipeline {
    /// Pipeline over the given transformer and selector
    #[must_use]
    pub const fn new(transformer: Arc<SchemaTransformer>, selector: SchemaSelector) -> Self {
        Self {
            transformer,
            selector,
        }
    }

    /// Parse output text and turn a rejected payload into `INVALID_RESPONSE`
    pub(crate) fn finish(
        &self,
        provider: ProviderKind,
        version: SchemaVersion,
        text: &str,
    ) -> Result<TodayPlan, ProviderError> {
        match self.transformer.transform_text(version, text) {
            TransformOutcome::Success { plan, .. } => Ok(plan),
            TransformOutcome::Failure { error, .. } => {
                warn!(provider = %provider, schema_version = %version, error = %error, "Provider output rejected by schema transformer");
                Err(ProviderError::invalid_response(
                    provider.as_str(),
                    error.to_string(),
                ))
            }
        }
    }
}

/// Build the HTTP client adapters share
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialised.
pub fn build_http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::config(format!("Failed to create HTTP client: {e}")))
}

/// Map a transport error into `REQUEST_FAILED`
pub(crate) fn transport_error(provider: ProviderKind, error: &reqwest::Error) -> ProviderError {
    ProviderError::request_failed(
        provider.as_str(),
        error.status().map(|s| s.as_u16()),
        redact_provider_keys(&error.to_string()),
    )
}

/// Map a non-success HTTP response into `REQUEST_FAILED`
pub(crate) fn status_error(provider: ProviderKind, status: u16, message: &str) -> ProviderError {
    let trimmed: String = message.chars().take(300).collect();
    ProviderError::request_failed(provider.as_str(), Some(status), redact_provider_keys(&trimmed))
}

/// Log the outcome of one adapter call without prompt content or keys
pub(crate) fn log_call(
    provider: ProviderKind,
    model: &str,
    regeneration: bool,
    started: Instant,
    result: &Result<GeneratedPlan, ProviderError>,
) {
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mode = if regeneration { "regeneration" } else { "initial" };
    match result {
        Ok(generated) => info!(
            provider = %provider,
            model = %model,
            mode,
            latency_ms,
            schema_version = %generated.schema_version,
            "Plan generated"
        ),
        Err(error) => warn!(
            provider = %provider,
            model = %model,
            mode,
            latency_ms,
            kind = error.kind(),
            error = %redact_provider_keys(&error.to_string()),
            "Plan generation failed"
        ),
    }
}
