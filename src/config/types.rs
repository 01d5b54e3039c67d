// ABOUTME: Core configuration type definitions for deployment and provider settings
// ABOUTME: Contains Environment, DeploymentEdition, and ProviderKind enums used across config modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Environment type for logging and other deployment-sensitive behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment (default)
    #[default]
    Development,
    /// Production environment
    Production,
    /// Testing environment for automated tests
    Testing,
}

impl Environment {
    /// Environment variable name
    pub const ENV_VAR: &'static str = "ENVIRONMENT";

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development, // Default fallback (including "development" | "dev")
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Which deployment edition is running
///
/// The open edition serves locally built fallback plans when no credential is
/// available; the BYOK edition refuses to generate without one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEdition {
    /// Open-source edition, credential optional (default)
    #[default]
    Open,
    /// Bring-your-own-key edition, credential required
    Byok,
}

impl DeploymentEdition {
    /// Environment variable name for edition selection
    pub const ENV_VAR: &'static str = "WORKOUT_EDITION";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "byok" | "hosted" => Self::Byok,
            _ => Self::Open, // Default fallback (including "open" | "oss")
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Whether generation must fail when no credential resolves
    #[must_use]
    pub const fn requires_credential(&self) -> bool {
        matches!(self, Self::Byok)
    }
}

impl Display for DeploymentEdition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Open => write!(f, "open"),
            Self::Byok => write!(f, "byok"),
        }
    }
}

/// Closed set of LLM vendors a plan can be generated with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// `OpenAI` responses API (default)
    #[default]
    OpenAi,
    /// Google Gemini content API, optionally through Vertex AI
    Gemini,
    /// Any `OpenAI`-compatible chat completions endpoint
    OpenAiCompatible,
}

impl ProviderKind {
    /// Environment variable for the deployment's default provider
    pub const ENV_VAR: &'static str = "WORKOUT_DEFAULT_PROVIDER";

    /// Every provider kind
    pub const ALL: [Self; 3] = [Self::OpenAi, Self::Gemini, Self::OpenAiCompatible];

    /// Strict parse used for caller-supplied provider names
    #[must_use]
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "gemini" | "google" => Some(Self::Gemini),
            "openai-compatible" | "openai_compatible" | "compatible" => Some(Self::OpenAiCompatible),
            _ => None,
        }
    }

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        Self::parse_name(s).unwrap_or_default()
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
