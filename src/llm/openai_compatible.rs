// ABOUTME: Generic OpenAI-compatible chat completions adapter for structured workout plans
// ABOUTME: Works with Groq, Together, vLLM, Ollama and other endpoints speaking /chat/completions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Generic adapter for any endpoint implementing `POST /chat/completions` with
//! `response_format = json_schema`. These endpoints keep no server-side
//! conversation state, so a regeneration sends the initial prompt followed by
//! the regeneration prompt. Only the nested schema version is requested; flat
//! output support varies too much across backends.
//!
//! ## Supported Backends
//!
//! - **Groq**: <https://api.groq.com/openai/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **Ollama**: <http://localhost:11434/v1>

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
use super::schemas::{json_schema, SCHEMA_NAME};
use super::{
    build_http_client, log_call, status_error, transport_error, GeneratedPlan, GenerationOptions,
    PlanProvider, ProviderCapabilities, SchemaPipeline,
};
use crate::config::ProviderKind;

/// Default base URL (local Ollama)
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

const SUPPORTED_VERSIONS: [SchemaVersion; 1] = [SchemaVersion::Nested];

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaSpec,
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec {
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Provider
// ============================================================================

/// Static settings for an `OpenAI`-compatible endpoint
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// API base URL
    pub base_url: String,
    /// Key for endpoints that require one; local servers usually do not
    pub api_key: Option<String>,
    /// Model used when the call carries no override
    pub default_model: String,
    /// Name shown in logs and listings
    pub display_name: &'static str,
    /// HTTP timeout
    pub timeout: Duration,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            display_name: "OpenAI-compatible",
            timeout: Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("display_name", &self.display_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Chat completions adapter
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
    schemas: SchemaPipeline,
}

impl OpenAiCompatibleProvider {
    /// Create an adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiCompatibleConfig, schemas: SchemaPipeline) -> Result<Self, AppError> {
        let client = build_http_client(config.timeout)?;
        Ok(Self {
            client,
            config,
            schemas,
        })
    }

    async fn call(
        &self,
        api_key: &str,
        model: &str,
        base_url: &str,
        version: SchemaVersion,
        request: &GenerationRequest,
        context: &GenerationContext,
    ) -> Result<GeneratedPlan, ProviderError> {
        let kind = self.kind();
        let messages = build_conversation(request, context, false);
        let body = ChatCompletionRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: SCHEMA_NAME,
                    schema: json_schema(version),
                    strict: true,
                },
            },
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        debug!(schema_version = %version, messages = body.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
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

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(kind.as_str(), e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::invalid_response(kind.as_str(), "empty output"))?;
        let plan = self.schemas.finish(kind, version, text)?;

        Ok(GeneratedPlan {
            plan,
            response_id: parsed.id,
            schema_version: version,
            model: model.to_owned(),
        })
    }
}

#[async_trait]
impl PlanProvider for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompatible
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::STRUCTURED_OUTPUT
    }

    fn supported_schema_versions(&self) -> &[SchemaVersion] {
        &SUPPORTED_VERSIONS
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip_all, fields(provider = "openai-compatible", regeneration = request.is_regeneration()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        options: &GenerationOptions,
    ) -> Result<GeneratedPlan, ProviderError> {
        let configured = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty());
        let Some(api_key) = options.api_key().or(configured) else {
            return Err(ProviderError::no_api_key(self.kind().as_str()));
        };
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
        let result = self
            .call(api_key, model, base_url, version, request, context)
            .await;
        log_call(self.kind(), model, request.is_regeneration(), started, &result);
        result
    }
}

impl Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
