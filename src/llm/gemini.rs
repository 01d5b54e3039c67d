// ABOUTME: Google Gemini adapter producing structured workout plans via generateContent
// ABOUTME: Supports API-key auth against AI Studio and ambient credentials against Vertex AI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! ## Authentication
//!
//! - **API key**: sent in the `x-goog-api-key` header, never in the URL
//! - **Vertex AI**: when a [`VertexTarget`] is configured and the call asks for
//!   ambient credentials, the regional Vertex endpoint is used with a bearer
//!   token from [`GcpAuth`]
//!
//! ## Supported Models
//!
//! - `gemini-2.5-flash` (default)
//! - `gemini-2.5-pro`
//! - `gemini-2.0-flash`

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use workout_core::constants::defaults;
use workout_core::errors::{AppError, ProviderError};
use workout_core::models::{GenerationContext, GenerationRequest, SchemaVersion};

use super::prompts::build_conversation;
use super::schemas::gemini_schema;
use super::vertex::{GcpAuth, VertexTarget};
use super::{
    build_http_client, log_call, status_error, transport_error, ChatMessage, GeneratedPlan,
    GenerationOptions, MessageRole, PlanProvider, ProviderCapabilities, SchemaPipeline,
};
use crate::config::ProviderKind;

/// Default model to use
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SUPPORTED_VERSIONS: [SchemaVersion; 2] = [SchemaVersion::Nested, SchemaVersion::Flat];

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    response_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

/// How one call authenticates
enum Credential<'a> {
    ApiKey(&'a str),
    Vertex(&'a VertexTarget, String),
}

// ============================================================================
// Provider
// ============================================================================

/// Static Gemini adapter settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// AI Studio API base URL
    pub base_url: String,
    /// Model used when the call carries no override
    pub default_model: String,
    /// Vertex AI target enabling ambient credentials
    pub vertex: Option<VertexTarget>,
    /// HTTP timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            default_model: DEFAULT_MODEL.to_owned(),
            vertex: None,
            timeout: Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS),
        }
    }
}

/// Gemini `generateContent` adapter
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    gcp_auth: GcpAuth,
    schemas: SchemaPipeline,
}

impl GeminiProvider {
    /// Create an adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig, schemas: SchemaPipeline) -> Result<Self, AppError> {
        let client = build_http_client(config.timeout)?;
        Ok(Self {
            gcp_auth: GcpAuth::new(client.clone()),
            client,
            config,
            schemas,
        })
    }

    async fn resolve_credential<'a>(
        &'a self,
        options: &'a GenerationOptions,
    ) -> Result<Credential<'a>, ProviderError> {
        if let Some(key) = options.api_key() {
            return Ok(Credential::ApiKey(key));
        }
        match (&self.config.vertex, options.use_vertex_ai) {
            (Some(target), true) => {
                let token = self.gcp_auth.access_token().await?;
                Ok(Credential::Vertex(target, token))
            }
            _ => Err(ProviderError::no_api_key(self.kind().as_str())),
        }
    }

    fn build_body<'a>(
        messages: &'a [ChatMessage],
        version: SchemaVersion,
    ) -> GenerateContentRequest<'a> {
        let system_instruction = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| SystemInstruction {
                parts: vec![Part { text: &m.content }],
            });
        let contents = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| Content {
                role: if m.role == MessageRole::Assistant {
                    "model"
                } else {
                    "user"
                },
                parts: vec![Part { text: &m.content }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: gemini_schema(version),
            },
        }
    }

    async fn call(
        &self,
        credential: Credential<'_>,
        model: &str,
        base_url: &str,
        version: SchemaVersion,
        request: &GenerationRequest,
        context: &GenerationContext,
    ) -> Result<GeneratedPlan, ProviderError> {
        let kind = self.kind();
        let messages = build_conversation(request, context, false);
        let body = Self::build_body(&messages, version);

        let builder = match &credential {
            Credential::ApiKey(key) => {
                let url = format!(
                    "{}/models/{model}:generateContent",
                    base_url.trim_end_matches('/')
                );
                self.client.post(url).header("x-goog-api-key", *key)
            }
            Credential::Vertex(target, token) => self
                .client
                .post(target.generate_url(model))
                .bearer_auth(token),
        };

        debug!(
            schema_version = %version,
            vertex = matches!(credential, Credential::Vertex(..)),
            "Sending request to Gemini API"
        );

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(kind, &e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map_or(text, |body| body.error.message);
            return Err(status_error(kind, status.as_u16(), &message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(kind.as_str(), e.to_string()))?;

        let Some(text) = parsed.text() else {
            let reason = parsed.finish_reason().unwrap_or("no candidates");
            return Err(ProviderError::invalid_response(
                kind.as_str(),
                format!("empty output ({reason})"),
            ));
        };
        let plan = self.schemas.finish(kind, version, &text)?;

        Ok(GeneratedPlan {
            plan,
            response_id: parsed.response_id,
            schema_version: version,
            model: model.to_owned(),
        })
    }
}

#[async_trait]
impl PlanProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        if self.config.vertex.is_some() {
            ProviderCapabilities::STRUCTURED_OUTPUT | ProviderCapabilities::AMBIENT_CREDENTIALS
        } else {
            ProviderCapabilities::STRUCTURED_OUTPUT
        }
    }

    fn supported_schema_versions(&self) -> &[SchemaVersion] {
        &SUPPORTED_VERSIONS
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip_all, fields(provider = "gemini", regeneration = request.is_regeneration()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        options: &GenerationOptions,
    ) -> Result<GeneratedPlan, ProviderError> {
        let model = options.model.as_deref().unwrap_or(&self.config.default_model);
        let base_url = options
            .api_base_url
            .as_deref()
            .unwrap_or(&self.config.base_url);
        let version = self
            .schemas
            .selector
            .select(self.supported_schema_versions(), options.schema_version);

        let started = Instant::now();
        let result = match self.resolve_credential(options).await {
            Ok(credential) => {
                self.call(credential, model, base_url, version, request, context)
                    .await
            }
            Err(error) => Err(error),
        };
        if !matches!(result, Err(ProviderError::NoApiKey { .. })) {
            log_call(self.kind(), model, request.is_regeneration(), started, &result);
        }
        result
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .field("vertex", &self.config.vertex)
            .finish_non_exhaustive()
    }
}
