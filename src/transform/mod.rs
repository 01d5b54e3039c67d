// ABOUTME: Multi-version schema transformer turning raw provider payloads into canonical plans
// ABOUTME: Version registry, discriminated outcome type, and the flat enum-expansion hook
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Schema Transformer
//!
//! Providers are asked for structured output following one of the
//! [`SchemaVersion`] wire contracts. The transformer validates the raw payload
//! against the matching loose shape, reshapes it, attaches fresh identifiers,
//! and re-validates the canonical [`TodayPlan`].
//!
//! Failures are returned as data inside [`TransformOutcome`]; nothing here
//! propagates an error across the transformer boundary.

mod flat;
mod nested;
mod repair;
mod selection;
mod validation;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use workout_core::models::{LlmPlan, SchemaVersion, TodayPlan};

pub use repair::{coerce_integer_fields, parse_payload_text};
pub use selection::{SchemaSelector, ESTIMATED_SIZE_BYTES};
pub use validation::validate_today_plan;

/// Why a payload could not be turned into a canonical plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Payload text was empty or not JSON
    #[error("payload is not valid JSON: {0}")]
    NotJson(String),
    /// Payload did not match the loose shape of its schema version
    #[error("payload does not match the {version} schema: {message}")]
    Shape {
        /// Schema version being validated
        version: SchemaVersion,
        /// Deserializer message
        message: String,
    },
    /// A field holds a value outside its allowed range
    #[error("{field}: {message}")]
    InvalidField {
        /// JSON path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
    /// No transform function is registered for the version
    #[error("no transform registered for schema version {0}")]
    Unregistered(SchemaVersion),
}

impl TransformError {
    pub(crate) fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result of one transformation attempt; callers must branch on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Canonical plan produced
    Success {
        /// The canonical plan
        plan: TodayPlan,
        /// Version the payload followed
        schema_version: SchemaVersion,
    },
    /// Payload rejected
    Failure {
        /// Why it was rejected
        error: TransformError,
        /// Version the payload was checked against
        schema_version: SchemaVersion,
    },
}

impl TransformOutcome {
    /// Whether a plan was produced
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Schema version the attempt used
    #[must_use]
    pub const fn schema_version(&self) -> SchemaVersion {
        match self {
            Self::Success { schema_version, .. } | Self::Failure { schema_version, .. } => {
                *schema_version
            }
        }
    }

    /// Convert into a `Result` for callers that want `?`-style handling
    ///
    /// # Errors
    ///
    /// Returns the transform error when the payload was rejected.
    pub fn into_result(self) -> Result<(TodayPlan, SchemaVersion), TransformError> {
        match self {
            Self::Success {
                plan,
                schema_version,
            } => Ok((plan, schema_version)),
            Self::Failure { error, .. } => Err(error),
        }
    }
}

/// Hook run over a raw flat payload before validation
///
/// Reserved for expanding abbreviated enum values; the default leaves the
/// payload untouched.
pub type EnumExpansionHook = Arc<dyn Fn(&mut Value) + Send + Sync>;

/// Hooks available to transform functions
#[derive(Clone)]
pub struct TransformHooks {
    /// Runs on flat payloads after integer repair and before validation
    pub flat_enum_expansion: EnumExpansionHook,
}

impl Default for TransformHooks {
    fn default() -> Self {
        Self {
            flat_enum_expansion: Arc::new(|_payload: &mut Value| {}),
        }
    }
}

impl Debug for TransformHooks {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TransformHooks").finish_non_exhaustive()
    }
}

/// Pure transform from a repaired raw payload to a canonical plan
pub type TransformFn = fn(Value, &TransformHooks) -> Result<TodayPlan, TransformError>;

/// Registry of transform functions keyed by schema version
#[derive(Debug, Clone)]
pub struct SchemaTransformer {
    registry: HashMap<SchemaVersion, TransformFn>,
    hooks: TransformHooks,
}

impl Default for SchemaTransformer {
    fn default() -> Self {
        Self::standard()
    }
}

impl SchemaTransformer {
    /// Transformer with every built-in version registered
    #[must_use]
    pub fn standard() -> Self {
        let mut registry: HashMap<SchemaVersion, TransformFn> = HashMap::new();
        registry.insert(SchemaVersion::Nested, nested::transform_nested);
        registry.insert(SchemaVersion::Flat, flat::transform_flat);
        Self {
            registry,
            hooks: TransformHooks::default(),
        }
    }

    /// Transformer with no versions registered
    #[must_use]
    pub fn empty() -> Self {
        Self {
            registry: HashMap::new(),
            hooks: TransformHooks::default(),
        }
    }

    /// Register or replace the transform for a version
    #[must_use]
    pub fn with_transform(mut self, version: SchemaVersion, transform: TransformFn) -> Self {
        self.registry.insert(version, transform);
        self
    }

    /// Replace the flat enum-expansion hook
    #[must_use]
    pub fn with_flat_enum_expansion(mut self, hook: EnumExpansionHook) -> Self {
        self.hooks.flat_enum_expansion = hook;
        self
    }

    /// Versions with a registered transform
    #[must_use]
    pub fn registered_versions(&self) -> Vec<SchemaVersion> {
        let mut versions: Vec<SchemaVersion> = self.registry.keys().copied().collect();
        versions.sort();
        versions
    }

    /// Transform an already parsed payload
    #[must_use]
    pub fn transform(&self, version: SchemaVersion, mut raw: Value) -> TransformOutcome {
        let Some(transform) = self.registry.get(&version) else {
            return TransformOutcome::Failure {
                error: TransformError::Unregistered(version),
                schema_version: version,
            };
        };

        coerce_integer_fields(&mut raw);

        match transform(raw, &self.hooks) {
            Ok(plan) => TransformOutcome::Success {
                plan,
                schema_version: version,
            },
            Err(error) => TransformOutcome::Failure {
                error,
                schema_version: version,
            },
        }
    }

    /// Parse provider output text and transform it
    #[must_use]
    pub fn transform_text(&self, version: SchemaVersion, text: &str) -> TransformOutcome {
        match parse_payload_text(text) {
            Ok(raw) => self.transform(version, raw),
            Err(error) => TransformOutcome::Failure {
                error,
                schema_version: version,
            },
        }
    }

    /// Turn a locally built loose plan into a canonical plan
    #[must_use]
    pub fn canonicalize(&self, plan: &LlmPlan) -> TransformOutcome {
        match serde_json::to_value(plan) {
            Ok(raw) => self.transform(SchemaVersion::Nested, raw),
            Err(e) => TransformOutcome::Failure {
                error: TransformError::NotJson(e.to_string()),
                schema_version: SchemaVersion::Nested,
            },
        }
    }
}
