// ABOUTME: Schema version selection for providers that accept more than one wire format
// ABOUTME: Caller override, validated environment override, single-version, then smallest estimated size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{debug, warn};
use workout_core::models::SchemaVersion;

/// Static estimate of a typical serialized plan per version, in bytes
pub const ESTIMATED_SIZE_BYTES: [(SchemaVersion, usize); 2] =
    [(SchemaVersion::Nested, 2_400), (SchemaVersion::Flat, 2_100)];

/// Picks the schema version a provider is asked to follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSelector {
    env_override: Option<SchemaVersion>,
    size_table: Vec<(SchemaVersion, usize)>,
}

impl Default for SchemaSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaSelector {
    /// Environment variable forcing a schema version
    pub const ENV_VAR: &'static str = "WORKOUT_SCHEMA_VERSION";

    /// Selector using the built-in size table and no environment override
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_override: None,
            size_table: ESTIMATED_SIZE_BYTES.to_vec(),
        }
    }

    /// Apply a raw environment override, ignoring it with a warning when invalid
    #[must_use]
    pub fn with_env_override(mut self, raw: Option<&str>) -> Self {
        self.env_override = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| {
                let parsed = SchemaVersion::parse_str(value);
                if parsed.is_none() {
                    warn!(
                        value = %value,
                        variable = Self::ENV_VAR,
                        "Ignoring unknown schema version override"
                    );
                }
                parsed
            });
        self
    }

    /// Replace the size table
    #[must_use]
    pub fn with_size_table(mut self, table: Vec<(SchemaVersion, usize)>) -> Self {
        self.size_table = table;
        self
    }

    /// Validated environment override, if any
    #[must_use]
    pub const fn env_override(&self) -> Option<SchemaVersion> {
        self.env_override
    }

    /// Select a version for a provider declaring `supported`
    #[must_use]
    pub fn select(
        &self,
        supported: &[SchemaVersion],
        caller_override: Option<SchemaVersion>,
    ) -> SchemaVersion {
        if let Some(version) = caller_override {
            return version;
        }

        if let Some(version) = self.env_override {
            if supported.contains(&version) {
                return version;
            }
            debug!(version = %version, "Schema override not supported by provider; selecting normally");
        }

        match supported {
            [] => SchemaVersion::default(),
            [only] => *only,
            _ => self.smallest(supported),
        }
    }

    fn estimated_size(&self, version: SchemaVersion) -> usize {
        self.size_table
            .iter()
            .find(|(v, _)| *v == version)
            .map_or(usize::MAX, |(_, size)| *size)
    }

    fn smallest(&self, supported: &[SchemaVersion]) -> SchemaVersion {
        supported
            .iter()
            .copied()
            .min_by_key(|version| {
                // Ties go to flat
                (self.estimated_size(*version), *version != SchemaVersion::Flat)
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [SchemaVersion; 2] = [SchemaVersion::Nested, SchemaVersion::Flat];

    #[test]
    fn test_tie_goes_to_flat() {
        let selector = SchemaSelector::new().with_size_table(vec![
            (SchemaVersion::Nested, 1_000),
            (SchemaVersion::Flat, 1_000),
        ]);
        assert_eq!(selector.select(&BOTH, None), SchemaVersion::Flat);
    }

    #[test]
    fn test_smaller_size_wins() {
        let selector = SchemaSelector::new().with_size_table(vec![
            (SchemaVersion::Nested, 900),
            (SchemaVersion::Flat, 1_000),
        ]);
        assert_eq!(selector.select(&BOTH, None), SchemaVersion::Nested);
    }

    #[test]
    fn test_env_override_parsing() {
        assert_eq!(
            SchemaSelector::new()
                .with_env_override(Some("nested"))
                .env_override(),
            Some(SchemaVersion::Nested)
        );
        assert_eq!(
            SchemaSelector::new()
                .with_env_override(Some("v9"))
                .env_override(),
            None
        );
        assert_eq!(SchemaSelector::new().with_env_override(Some(" ")).env_override(), None);
    }

    #[test]
    fn test_env_override_skipped_when_unsupported() {
        let selector = SchemaSelector::new().with_env_override(Some("flat"));
        assert_eq!(
            selector.select(&[SchemaVersion::Nested], None),
            SchemaVersion::Nested
        );
        assert_eq!(selector.select(&BOTH, None), SchemaVersion::Flat);
    }
}
