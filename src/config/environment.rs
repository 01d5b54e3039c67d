// ABOUTME: Environment configuration for the workout planner server
// ABOUTME: Parses listen address, edition, provider keys and models, Vertex settings, and pipeline tuning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use workout_core::constants::defaults;
use workout_core::models::SchemaVersion;

use super::types::{DeploymentEdition, Environment, ProviderKind};
use crate::llm::vertex::DEFAULT_REGION;
use crate::transform::SchemaSelector;

/// Credentials and overrides for one provider
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Server-managed API key
    pub api_key: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
}

impl ProviderSettings {
    fn from_env(key_var: &str, model_var: &str, base_url_var: &str) -> Self {
        Self {
            api_key: non_empty_var(key_var),
            model: non_empty_var(model_var),
            base_url: non_empty_var(base_url_var),
        }
    }

    /// Whether a server-managed key is configured
    #[must_use]
    pub const fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Debug for ProviderSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Vertex AI ambient-credential settings for Gemini
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexSettings {
    /// Whether Vertex mode is requested
    pub enabled: bool,
    /// GCP project id
    pub project_id: Option<String>,
    /// GCP region
    pub region: String,
}

impl Default for VertexSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: None,
            region: DEFAULT_REGION.to_owned(),
        }
    }
}

impl VertexSettings {
    /// Project and region when Vertex mode is fully configured
    #[must_use]
    pub fn target(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        self.project_id
            .as_deref()
            .map(|project| (project, self.region.as_str()))
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// HTTP listen host
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Deployment edition
    pub edition: DeploymentEdition,
    /// Provider used when the request names none
    pub default_provider: ProviderKind,
    /// `OpenAI` settings
    pub openai: ProviderSettings,
    /// Gemini settings
    pub gemini: ProviderSettings,
    /// `OpenAI`-compatible endpoint settings
    pub compatible: ProviderSettings,
    /// Vertex AI settings
    pub vertex: VertexSettings,
    /// Raw forced schema version, validated by the selector
    pub schema_version: Option<String>,
    /// ETA recorded when a generation is submitted
    pub generation_eta_secs: u32,
    /// Sessions kept per device
    pub recent_session_limit: usize,
    /// Adapter HTTP timeout
    pub provider_timeout_secs: u64,
    /// Comma-separated allowed CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: "0.0.0.0".to_owned(),
            environment: Environment::default(),
            edition: DeploymentEdition::default(),
            default_provider: ProviderKind::default(),
            openai: ProviderSettings::default(),
            gemini: ProviderSettings::default(),
            compatible: ProviderSettings::default(),
            vertex: VertexSettings::default(),
            schema_version: None,
            generation_eta_secs: defaults::GENERATION_ETA_SECONDS,
            recent_session_limit: defaults::RECENT_SESSION_LIMIT,
            provider_timeout_secs: defaults::PROVIDER_TIMEOUT_SECS,
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed or the result
    /// fails [`Self::validate`].
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            host: env_var_or("HOST", "0.0.0.0"),
            environment: Environment::from_str_or_default(&env_var_or(Environment::ENV_VAR, "")),
            edition: DeploymentEdition::from_env(),
            default_provider: ProviderKind::from_env(),
            openai: ProviderSettings::from_env("OPENAI_API_KEY", "OPENAI_MODEL", "OPENAI_BASE_URL"),
            gemini: ProviderSettings::from_env("GEMINI_API_KEY", "GEMINI_MODEL", "GEMINI_BASE_URL"),
            compatible: ProviderSettings::from_env("AI_API_KEY", "COMPAT_MODEL", "COMPAT_BASE_URL"),
            vertex: VertexSettings {
                enabled: parse_bool(&env_var_or("GEMINI_USE_VERTEX_AI", "false")),
                project_id: non_empty_var("GCP_PROJECT_ID"),
                region: non_empty_var("GCP_REGION").unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            },
            schema_version: non_empty_var(SchemaSelector::ENV_VAR),
            generation_eta_secs: env_var_or(
                "WORKOUT_GENERATION_ETA_SECS",
                &defaults::GENERATION_ETA_SECONDS.to_string(),
            )
            .parse()
            .context("Invalid WORKOUT_GENERATION_ETA_SECS value")?,
            recent_session_limit: env_var_or(
                "WORKOUT_RECENT_SESSION_LIMIT",
                &defaults::RECENT_SESSION_LIMIT.to_string(),
            )
            .parse()
            .context("Invalid WORKOUT_RECENT_SESSION_LIMIT value")?,
            provider_timeout_secs: env_var_or(
                "PROVIDER_TIMEOUT_SECS",
                &defaults::PROVIDER_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .context("Invalid PROVIDER_TIMEOUT_SECS value")?,
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Check cross-field consistency
    ///
    /// # Errors
    ///
    /// Returns an error for a zero session limit or timeout.
    pub fn validate(&self) -> Result<()> {
        if self.recent_session_limit == 0 {
            bail!("WORKOUT_RECENT_SESSION_LIMIT must be at least 1");
        }
        if self.provider_timeout_secs == 0 {
            bail!("PROVIDER_TIMEOUT_SECS must be at least 1");
        }
        if self.vertex.enabled && self.vertex.project_id.is_none() {
            warn!("GEMINI_USE_VERTEX_AI is set but GCP_PROJECT_ID is missing; Vertex AI disabled");
        }
        if let Some(raw) = &self.schema_version {
            if SchemaVersion::parse_str(raw).is_none() {
                warn!(value = %raw, "Unknown {}; automatic selection will be used", SchemaSelector::ENV_VAR);
            }
        }
        Ok(())
    }

    /// Server-managed key for a provider
    #[must_use]
    pub fn server_key(&self, kind: ProviderKind) -> Option<&str> {
        self.provider_settings(kind).api_key.as_deref()
    }

    /// Settings block for a provider
    #[must_use]
    pub const fn provider_settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAiCompatible => &self.compatible,
        }
    }

    /// Configuration summary for startup logs (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let key_state = |settings: &ProviderSettings| {
            if settings.has_key() {
                "server key"
            } else {
                "BYOK only"
            }
        };
        format!(
            "Workout Planner Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Edition: {}\n\
             - Default Provider: {}\n\
             - OpenAI: {}\n\
             - Gemini: {}{}\n\
             - OpenAI-compatible: {}\n\
             - Schema Override: {}\n\
             - Generation ETA: {}s\n\
             - Recent Session Limit: {}\n\
             - Provider Timeout: {}s\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            self.edition,
            self.default_provider,
            key_state(&self.openai),
            key_state(&self.gemini),
            if self.vertex.target().is_some() {
                " + Vertex AI"
            } else {
                ""
            },
            key_state(&self.compatible),
            self.schema_version.as_deref().unwrap_or("auto"),
            self.generation_eta_secs,
            self.recent_session_limit,
            self.provider_timeout_secs,
            self.cors_allowed_origins,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-blank environment variable
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
