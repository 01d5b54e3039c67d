// ABOUTME: OpenAI Responses API adapter producing structured workout plans
// ABOUTME: Uses strict json_schema output and previous_response_id chaining for regeneration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI` Provider
//!
//! Talks to `POST {base}/responses`. Regeneration requests are chained to the
//! previous response server-side, so only the regeneration prompt is sent.
//!
//! ## Supported Models
//!
//! - `gpt-4o-mini` (default)
//! - any model that accepts `text.format = json_schema`

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
    MessageRole, PlanProvider, ProviderCapabilities, SchemaPipeline,
};
use crate::config::ProviderKind;

/// Default model to use
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Base URL for the `OpenAI` API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SUPPORTED_VERSIONS: [SchemaVersion; 2] = [SchemaVersion::Nested, SchemaVersion::Flat];

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: Vec<InputMessage<'a>>,
    text: TextOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    id: Option<String>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(default)]
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

impl ResponsesResponse {
    /// Aggregated text if present, else the first non-empty content part
    fn text(&self) -> Option<&str> {
        self.output_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .or_else(|| {
                self.output
                    .iter()
                    .flat_map(|item| item.content.iter())
                    .filter_map(|part| part.text.as_deref())
                    .find(|text| !text.trim().is_empty())
            })
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Static `OpenAI` adapter settings
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,
    /// Model used when the call carries no override
    pub default_model: String,
    /// HTTP timeout
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            default_model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS),
        }
    }
}

/// `OpenAI` Responses API adapter
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    schemas: SchemaPipeline,
}

impl OpenAiProvider {
    /// Create an adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig, schemas: SchemaPipeline) -> Result<Self, AppError> {
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
        let messages = build_conversation(request, context, true);
        let instructions = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map_or("", |m| m.content.as_str());
        let input = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| InputMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        let body = ResponsesRequest {
            model,
            instructions,
            input,
            text: TextOptions {
                format: JsonSchemaFormat {
                    format_type: "json_schema",
                    name: SCHEMA_NAME,
                    schema: json_schema(version),
                    strict: true,
                },
            },
            previous_response_id: request
                .previous_response_id
                .as_deref()
                .filter(|_| request.is_regeneration()),
        };

        let url = format!("{}/responses", base_url.trim_end_matches('/'));
        debug!(schema_version = %version, "Sending request to OpenAI Responses API");

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

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid_response(kind.as_str(), e.to_string()))?;

        let text = parsed
            .text()
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
impl PlanProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn display_name(&self) -> &'static str {
        "OpenAI"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::STRUCTURED_OUTPUT | ProviderCapabilities::RESPONSE_CHAINING
    }

    fn supported_schema_versions(&self) -> &[SchemaVersion] {
        &SUPPORTED_VERSIONS
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip_all, fields(provider = "openai", regeneration = request.is_regeneration()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &GenerationContext,
        options: &GenerationOptions,
    ) -> Result<GeneratedPlan, ProviderError> {
        let Some(api_key) = options.api_key() else {
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

impl Debug for OpenAiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}
