// ABOUTME: Common test utilities shared by the integration tests
// ABOUTME: Sample plans, scripted provider doubles, recording collaborators, and resource setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs
)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{HeaderMap, HeaderValue};
use workout_core::errors::ProviderError;
use workout_core::models::{
    Energy, GenerationContext, GenerationRequest, LlmBlock, LlmExercise, LlmPlan, SchemaVersion,
};
use workout_planner::config::{DeploymentEdition, ProviderKind, ServerConfig};
use workout_planner::llm::{
    GeneratedPlan, GenerationOptions, PlanProvider, ProviderCapabilities, ProviderRegistry,
};
use workout_planner::orchestrator::{MeteringSink, PolicyDecision, UsageEvent, UsagePolicy};
use workout_planner::resources::{ServerResources, ServerResourcesBuilder};
use workout_planner::transform::SchemaTransformer;

pub const DEVICE_TOKEN: &str = "device-token-abc";

pub fn exercise(name: &str) -> LlmExercise {
    LlmExercise {
        name: name.to_owned(),
        prescription: "3 x 10".to_owned(),
        detail: None,
    }
}

/// Three blocks with 1, 2, and 1 exercises
pub fn sample_llm_plan() -> LlmPlan {
    LlmPlan {
        focus: "upper body".to_owned(),
        duration_minutes: 30,
        equipment: vec!["dumbbells".to_owned()],
        source: "ai".to_owned(),
        energy: Energy::Moderate,
        summary: "Push and pull supersets.".to_owned(),
        blocks: vec![
            LlmBlock {
                title: "Warm-up".to_owned(),
                duration_minutes: 5,
                focus: "mobility".to_owned(),
                exercises: vec![exercise("Arm circles")],
            },
            LlmBlock {
                title: "Main set".to_owned(),
                duration_minutes: 20,
                focus: "upper body".to_owned(),
                exercises: vec![exercise("Floor press"), exercise("One-arm row")],
            },
            LlmBlock {
                title: "Cool-down".to_owned(),
                duration_minutes: 5,
                focus: "mobility".to_owned(),
                exercises: vec![exercise("Doorway stretch")],
            },
        ],
    }
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

// ============================================================================
// Scripted provider
// ============================================================================

/// What a scripted provider does on each call
#[derive(Debug, Clone)]
pub enum Script {
    Succeed(LlmPlan),
    Fail(ProviderError),
}

/// In-process `PlanProvider` double
pub struct ScriptedProvider {
    kind: ProviderKind,
    capabilities: ProviderCapabilities,
    script: Script,
    transformer: SchemaTransformer,
    calls: AtomicUsize,
    last_options: Mutex<Option<GenerationOptions>>,
}

impl ScriptedProvider {
    pub fn new(kind: ProviderKind, script: Script) -> Self {
        Self {
            kind,
            capabilities: ProviderCapabilities::STRUCTURED_OUTPUT,
            script,
            transformer: SchemaTransformer::standard(),
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(ProviderKind::OpenAi, Script::Succeed(sample_llm_plan()))
    }

    pub fn failing() -> Self {
        Self::new(
            ProviderKind::OpenAi,
            Script::Fail(ProviderError::request_failed(
                "openai",
                Some(503),
                "upstream unavailable for key sk-abcdefghijklmnopqrstuvwx",
            )),
        )
    }

    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.last_options
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|options| options.api_key.clone())
    }

    pub fn last_used_ambient(&self) -> bool {
        self.last_options
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|options| options.use_vertex_ai)
    }
}

#[async_trait]
impl PlanProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    fn supported_schema_versions(&self) -> &[SchemaVersion] {
        &[SchemaVersion::Nested]
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        _context: &GenerationContext,
        options: &GenerationOptions,
    ) -> Result<GeneratedPlan, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        match &self.script {
            Script::Succeed(plan) => {
                let (plan, schema_version) = self
                    .transformer
                    .canonicalize(plan)
                    .into_result()
                    .expect("sample plan is valid");
                Ok(GeneratedPlan {
                    plan,
                    response_id: Some("resp_scripted".to_owned()),
                    schema_version,
                    model: "scripted-model".to_owned(),
                })
            }
            Script::Fail(error) => Err(error.clone()),
        }
    }
}

// ============================================================================
// Recording collaborators
// ============================================================================

#[derive(Default)]
pub struct RecordingMetering {
    pub events: Mutex<Vec<UsageEvent>>,
}

impl RecordingMetering {
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl MeteringSink for RecordingMetering {
    async fn record_usage(&self, event: UsageEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct DenyPolicy {
    pub status: Option<u16>,
    pub retry_after: Option<u64>,
}

#[async_trait]
impl UsagePolicy for DenyPolicy {
    async fn can_generate(&self, _user_id: &str, _request: &GenerationRequest) -> PolicyDecision {
        PolicyDecision::Deny {
            status: self.status,
            reason: "Daily generation limit reached".to_owned(),
            retry_after: self.retry_after,
        }
    }
}

// ============================================================================
// Resource setup
// ============================================================================

pub fn config_for(edition: DeploymentEdition) -> ServerConfig {
    ServerConfig {
        edition,
        ..ServerConfig::default()
    }
}

pub fn registry_with(provider: Arc<ScriptedProvider>) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new(ProviderKind::OpenAi).with_provider(provider))
}

/// Builder preloaded with a config and a single scripted provider
pub fn resources_builder(
    config: ServerConfig,
    provider: Arc<ScriptedProvider>,
) -> ServerResourcesBuilder {
    ServerResources::builder()
        .with_config(Arc::new(config))
        .with_registry(registry_with(provider))
}

pub fn create_test_resources(
    edition: DeploymentEdition,
    provider: Arc<ScriptedProvider>,
) -> Arc<ServerResources> {
    resources_builder(config_for(edition), provider).build_arc()
}
