// ABOUTME: Provider and credential resolution from request headers and server configuration
// ABOUTME: Explicit provider header, legacy key-header inference, BYOK over server keys, ambient auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Debug, Formatter, Result as FmtResult};

use http::HeaderMap;
use serde::Serialize;
use workout_core::constants::headers;
use workout_core::errors::{AppError, AppResult};

use crate::config::{ProviderKind, ServerConfig};
use crate::llm::{GenerationOptions, ProviderCapabilities, ProviderRegistry};

/// Where a usable credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialSource {
    /// Key supplied by the caller
    Byok,
    /// Key configured on the server
    ServerManaged,
    /// Workload identity, no key
    Ambient,
}

/// Credential chosen for one generation
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    /// Origin of the credential
    pub source: CredentialSource,
    api_key: Option<String>,
}

impl ResolvedCredential {
    /// Adapter options carrying this credential
    #[must_use]
    pub fn to_options(&self) -> GenerationOptions {
        match self.source {
            CredentialSource::Ambient => GenerationOptions::ambient(),
            CredentialSource::Byok | CredentialSource::ServerManaged => GenerationOptions {
                api_key: self.api_key.clone(),
                ..GenerationOptions::default()
            },
        }
    }
}

impl Debug for ResolvedCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ResolvedCredential")
            .field("source", &self.source)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Trimmed, non-empty header value
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Provider-specific BYOK header, if the provider has one
const fn key_header(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::OpenAi => Some(headers::OPENAI_KEY),
        ProviderKind::Gemini => Some(headers::GEMINI_KEY),
        ProviderKind::OpenAiCompatible => None,
    }
}

/// Resolve which provider to use
///
/// Explicit `x-ai-provider` first, then inference from a provider-specific
/// key header, then the registry default.
///
/// # Errors
///
/// Returns `INVALID_PROVIDER` for an unknown name or one with no registered
/// adapter.
pub fn resolve_provider(headers: &HeaderMap, registry: &ProviderRegistry) -> AppResult<ProviderKind> {
    let kind = if let Some(name) = header_value(headers, headers::AI_PROVIDER) {
        ProviderKind::parse_name(name).ok_or_else(|| AppError::invalid_provider(name))?
    } else if header_value(headers, headers::OPENAI_KEY).is_some() {
        ProviderKind::OpenAi
    } else if header_value(headers, headers::GEMINI_KEY).is_some() {
        ProviderKind::Gemini
    } else {
        registry.default_kind()
    };

    if registry.contains(kind) {
        Ok(kind)
    } else {
        Err(AppError::invalid_provider(kind.as_str()))
    }
}

/// Resolve the credential for a provider
///
/// BYOK (provider header, then `x-ai-key`) beats the server-managed key; a
/// provider advertising ambient credentials needs neither.
#[must_use]
pub fn resolve_credential(
    headers: &HeaderMap,
    kind: ProviderKind,
    config: &ServerConfig,
    capabilities: ProviderCapabilities,
) -> Option<ResolvedCredential> {
    let byok = key_header(kind)
        .and_then(|name| header_value(headers, name))
        .or_else(|| header_value(headers, headers::AI_KEY));
    if let Some(key) = byok {
        return Some(ResolvedCredential {
            source: CredentialSource::Byok,
            api_key: Some(key.to_owned()),
        });
    }

    if let Some(key) = config.server_key(kind) {
        return Some(ResolvedCredential {
            source: CredentialSource::ServerManaged,
            api_key: Some(key.to_owned()),
        });
    }

    capabilities
        .supports_ambient_credentials()
        .then_some(ResolvedCredential {
            source: CredentialSource::Ambient,
            api_key: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_byok_header_beats_server_key() {
        let config = ServerConfig {
            gemini: ProviderSettings {
                api_key: Some("server-key".to_owned()),
                ..ProviderSettings::default()
            },
            ..ServerConfig::default()
        };
        let credential = resolve_credential(
            &headers(&[("x-gemini-key", "user-key")]),
            ProviderKind::Gemini,
            &config,
            ProviderCapabilities::STRUCTURED_OUTPUT,
        )
        .unwrap();
        assert_eq!(credential.source, CredentialSource::Byok);
        assert_eq!(credential.to_options().api_key(), Some("user-key"));

        let server = resolve_credential(
            &HeaderMap::new(),
            ProviderKind::Gemini,
            &config,
            ProviderCapabilities::STRUCTURED_OUTPUT,
        )
        .unwrap();
        assert_eq!(server.source, CredentialSource::ServerManaged);
    }

    #[test]
    fn test_generic_key_header_applies_to_any_provider() {
        let credential = resolve_credential(
            &headers(&[("x-ai-key", "generic")]),
            ProviderKind::OpenAiCompatible,
            &ServerConfig::default(),
            ProviderCapabilities::STRUCTURED_OUTPUT,
        )
        .unwrap();
        assert_eq!(credential.source, CredentialSource::Byok);
    }

    #[test]
    fn test_ambient_only_when_advertised() {
        let none = resolve_credential(
            &HeaderMap::new(),
            ProviderKind::Gemini,
            &ServerConfig::default(),
            ProviderCapabilities::STRUCTURED_OUTPUT,
        );
        assert!(none.is_none());
        let ambient = resolve_credential(
            &HeaderMap::new(),
            ProviderKind::Gemini,
            &ServerConfig::default(),
            ProviderCapabilities::STRUCTURED_OUTPUT | ProviderCapabilities::AMBIENT_CREDENTIALS,
        )
        .unwrap();
        assert_eq!(ambient.source, CredentialSource::Ambient);
        assert!(ambient.to_options().use_vertex_ai);
    }

    #[test]
    fn test_debug_redacts_key() {
        let credential = ResolvedCredential {
            source: CredentialSource::Byok,
            api_key: Some("sk-secret".to_owned()),
        };
        assert!(!format!("{credential:?}").contains("sk-secret"));
    }
}
