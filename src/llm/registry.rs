// ABOUTME: Provider registry mapping each ProviderKind to its adapter with a configurable default
// ABOUTME: Built once at startup from ServerConfig; lookups never branch on raw strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use workout_core::errors::AppError;

use super::{
    GeminiConfig, GeminiProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider, OpenAiConfig,
    OpenAiProvider, PlanProvider, SchemaPipeline, VertexTarget,
};
use crate::config::{ProviderKind, ServerConfig};

/// Adapters keyed by provider kind
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn PlanProvider>>,
    default_kind: ProviderKind,
}

impl ProviderRegistry {
    /// Empty registry with the given default
    #[must_use]
    pub fn new(default_kind: ProviderKind) -> Self {
        Self {
            providers: HashMap::new(),
            default_kind,
        }
    }

    /// Register an adapter under its own kind, replacing any previous one
    pub fn register(&mut self, provider: Arc<dyn PlanProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    /// Builder-style [`Self::register`]
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn PlanProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Adapter for a kind
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn PlanProvider>> {
        self.providers.get(&kind).cloned()
    }

    /// Configured default kind
    #[must_use]
    pub const fn default_kind(&self) -> ProviderKind {
        self.default_kind
    }

    /// Registered kinds in declaration order
    #[must_use]
    pub fn kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.contains_key(kind))
            .collect()
    }

    /// Whether an adapter is registered for a kind
    #[must_use]
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Registry with every built-in adapter configured from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter's HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig, schemas: &SchemaPipeline) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.provider_timeout_secs);

        let mut openai = OpenAiConfig {
            timeout,
            ..OpenAiConfig::default()
        };
        if let Some(model) = &config.openai.model {
            openai.default_model.clone_from(model);
        }
        if let Some(base_url) = &config.openai.base_url {
            openai.base_url.clone_from(base_url);
        }

        let mut gemini = GeminiConfig {
            timeout,
            vertex: config
                .vertex
                .target()
                .map(|(project, region)| VertexTarget::new(project, region)),
            ..GeminiConfig::default()
        };
        if let Some(model) = &config.gemini.model {
            gemini.default_model.clone_from(model);
        }
        if let Some(base_url) = &config.gemini.base_url {
            gemini.base_url.clone_from(base_url);
        }

        let mut compatible = OpenAiCompatibleConfig {
            timeout,
            ..OpenAiCompatibleConfig::default()
        };
        if let Some(model) = &config.compatible.model {
            compatible.default_model.clone_from(model);
        }
        if let Some(base_url) = &config.compatible.base_url {
            compatible.base_url.clone_from(base_url);
        }
        compatible.api_key.clone_from(&config.compatible.api_key);

        let registry = Self::new(config.default_provider)
            .with_provider(Arc::new(OpenAiProvider::new(openai, schemas.clone())?))
            .with_provider(Arc::new(GeminiProvider::new(gemini, schemas.clone())?))
            .with_provider(Arc::new(OpenAiCompatibleProvider::new(
                compatible,
                schemas.clone(),
            )?));

        info!(
            default = %registry.default_kind,
            providers = ?registry.kinds(),
            "Provider registry initialized"
        );
        Ok(registry)
    }
}

impl Debug for ProviderRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.kinds())
            .field("default_kind", &self.default_kind)
            .finish()
    }
}
