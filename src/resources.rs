// ABOUTME: Shared resource container handed to every route as axum state
// ABOUTME: Holds config, provider registry, transformer, stores, and the generate orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
// NOTE: `.clone()` calls here are `Arc` shares of long-lived resources.
//!
//! Built once at startup. Tests use [`ServerResourcesBuilder`] to swap in
//! scripted providers or custom collaborators.

use std::sync::Arc;

use tracing::info;
use workout_core::errors::AppError;

use crate::config::ServerConfig;
use crate::llm::{ProviderRegistry, SchemaPipeline};
use crate::orchestrator::{AuthProvider, GenerateOrchestrator, MeteringSink, UsagePolicy};
use crate::stores::{GenerationStore, InMemoryGenerationStore, InMemorySessionStore, SessionStore};
use crate::transform::{SchemaSelector, SchemaTransformer};

/// Resources shared by all HTTP handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Provider adapters
    pub registry: Arc<ProviderRegistry>,
    /// Schema transformer
    pub transformer: Arc<SchemaTransformer>,
    /// Per-device generation state
    pub generation_store: Arc<dyn GenerationStore>,
    /// Per-device session history
    pub session_store: Arc<dyn SessionStore>,
    /// Generate pipeline
    pub orchestrator: Arc<GenerateOrchestrator>,
    /// Device authentication shared by every route
    pub auth: Arc<dyn AuthProvider>,
}

impl ServerResources {
    /// Production resources: built-in adapters and in-memory stores
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter cannot be constructed.
    pub fn from_config(config: Arc<ServerConfig>) -> Result<Self, AppError> {
        let transformer = Arc::new(SchemaTransformer::standard());
        info!(
            versions = ?transformer.registered_versions(),
            "Schema transformer ready"
        );
        let pipeline = SchemaPipeline::new(
            Arc::clone(&transformer),
            SchemaSelector::new().with_env_override(config.schema_version.as_deref()),
        );
        let registry = ProviderRegistry::from_config(&config, &pipeline)?;
        Ok(Self::builder()
            .with_config(config)
            .with_registry(Arc::new(registry))
            .with_transformer(transformer)
            .build())
    }

    /// Create a new builder for `ServerResources`
    #[must_use]
    pub fn builder() -> ServerResourcesBuilder {
        ServerResourcesBuilder::new()
    }
}

/// Builder for [`ServerResources`]; unset parts get in-memory defaults
#[derive(Default)]
pub struct ServerResourcesBuilder {
    config: Option<Arc<ServerConfig>>,
    registry: Option<Arc<ProviderRegistry>>,
    transformer: Option<Arc<SchemaTransformer>>,
    generation_store: Option<Arc<dyn GenerationStore>>,
    session_store: Option<Arc<dyn SessionStore>>,
    auth: Option<Arc<dyn AuthProvider>>,
    policy: Option<Arc<dyn UsagePolicy>>,
    metering: Option<Arc<dyn MeteringSink>>,
}

impl ServerResourcesBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration
    #[must_use]
    pub fn with_config(mut self, config: Arc<ServerConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the provider registry
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the schema transformer
    #[must_use]
    pub fn with_transformer(mut self, transformer: Arc<SchemaTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Set the generation store
    #[must_use]
    pub fn with_generation_store(mut self, store: Arc<dyn GenerationStore>) -> Self {
        self.generation_store = Some(store);
        self
    }

    /// Set the session store
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Set the auth provider
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the usage policy
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn UsagePolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the metering sink
    #[must_use]
    pub fn with_metering(mut self, metering: Arc<dyn MeteringSink>) -> Self {
        self.metering = Some(metering);
        self
    }

    /// Build the `ServerResources`
    #[must_use]
    pub fn build(self) -> ServerResources {
        let config = self.config.unwrap_or_default();
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ProviderRegistry::new(config.default_provider)));
        let transformer = self
            .transformer
            .unwrap_or_else(|| Arc::new(SchemaTransformer::standard()));
        let generation_store = self
            .generation_store
            .unwrap_or_else(|| Arc::new(InMemoryGenerationStore::new()));
        let session_store = self
            .session_store
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new(config.recent_session_limit)));

        let mut orchestrator = GenerateOrchestrator::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            Arc::clone(&transformer),
            Arc::clone(&generation_store),
            Arc::clone(&session_store),
        );
        if let Some(auth) = self.auth {
            orchestrator = orchestrator.with_auth(auth);
        }
        if let Some(policy) = self.policy {
            orchestrator = orchestrator.with_policy(policy);
        }
        if let Some(metering) = self.metering {
            orchestrator = orchestrator.with_metering(metering);
        }

        ServerResources {
            auth: orchestrator.auth(),
            orchestrator: Arc::new(orchestrator),
            config,
            registry,
            transformer,
            generation_store,
            session_store,
        }
    }

    /// Build the `ServerResources` wrapped in an `Arc`
    #[must_use]
    pub fn build_arc(self) -> Arc<ServerResources> {
        Arc::new(self.build())
    }
}
