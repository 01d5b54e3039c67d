// ABOUTME: Secret-safe logging helpers that strip provider API keys and bearer tokens
// ABOUTME: Redacts key-shaped substrings, sensitive headers, and fingerprints device tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Redaction for anything that might end up in a log line or a stored status message
//!
//! Provider error bodies sometimes echo the key that was sent, and transport
//! errors can include full URLs. Every such message goes through
//! [`redact_provider_keys`] before it is logged or persisted.
//!
//! ```rust
//! use workout_planner::middleware::redaction::redact_provider_keys;
//!
//! let safe = redact_provider_keys("invalid key sk-abcdefghijklmnopqrstuv supplied");
//! assert_eq!(safe, "invalid key [REDACTED] supplied");
//! ```

use bitflags::bitflags;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Replacement text for redacted secrets
pub const REDACTION_PLACEHOLDER: &str = "[REDACTED]";

bitflags! {
    /// Which redaction passes to run
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RedactionFeatures: u8 {
        /// Vendor API key shapes (`sk-…`, `AIza…`, `gsk_…`)
        const PROVIDER_KEYS = 0b0001;
        /// `Bearer <token>` sequences
        const BEARER_TOKENS = 0b0010;
        /// `key=` query parameters in URLs
        const QUERY_KEYS = 0b0100;
        /// Every pass
        const ALL = Self::PROVIDER_KEYS.bits() | Self::BEARER_TOKENS.bits() | Self::QUERY_KEYS.bits();
    }
}

/// Sensitive HTTP headers that should never be logged verbatim
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "x-openai-key",
    "x-gemini-key",
    "x-ai-key",
    "x-goog-api-key",
    "x-api-key",
    "api-key",
    "cookie",
    "proxy-authorization",
];

/// Redact every known secret shape from `text`
#[must_use]
pub fn redact_provider_keys(text: &str) -> String {
    redact_with(text, RedactionFeatures::ALL)
}

/// Redact the selected secret shapes from `text`
#[must_use]
pub fn redact_with(text: &str, features: RedactionFeatures) -> String {
    let mut result = text.to_owned();

    if features.contains(RedactionFeatures::BEARER_TOKENS) {
        if let Some(re) = bearer_regex() {
            result = re
                .replace_all(&result, format!("Bearer {REDACTION_PLACEHOLDER}"))
                .into_owned();
        }
    }

    if features.contains(RedactionFeatures::PROVIDER_KEYS) {
        if let Some(re) = provider_key_regex() {
            result = re.replace_all(&result, REDACTION_PLACEHOLDER).into_owned();
        }
    }

    if features.contains(RedactionFeatures::QUERY_KEYS) {
        if let Some(re) = query_key_regex() {
            result = re
                .replace_all(&result, format!("${{1}}{REDACTION_PLACEHOLDER}"))
                .into_owned();
        }
    }

    result
}

/// Redact sensitive HTTP headers
///
/// Returns `(name, value)` pairs with secret-bearing header values replaced.
pub fn redact_headers<'a, I>(headers: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .map(|(name, value)| {
            let redacted = if SENSITIVE_HEADERS.contains(&name.to_lowercase().as_str()) {
                REDACTION_PLACEHOLDER.to_owned()
            } else {
                value.to_owned()
            };
            (name.to_owned(), redacted)
        })
        .collect()
}

/// Short, stable fingerprint of a device token for log correlation
#[must_use]
pub fn fingerprint_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

fn provider_key_regex() -> Option<&'static Regex> {
    static PROVIDER_KEY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    PROVIDER_KEY_REGEX
        .get_or_init(|| {
            Regex::new(r"(sk-(?:proj-|ant-)?[A-Za-z0-9_\-]{16,}|AIza[0-9A-Za-z_\-]{30,}|gsk_[A-Za-z0-9]{20,})")
                .ok()
        })
        .as_ref()
}

fn bearer_regex() -> Option<&'static Regex> {
    static BEARER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BEARER_REGEX
        .get_or_init(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-._~+/]+=*").ok())
        .as_ref()
}

fn query_key_regex() -> Option<&'static Regex> {
    static QUERY_KEY_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    QUERY_KEY_REGEX
        .get_or_init(|| Regex::new(r"([?&](?:key|api_key)=)[^&\s]+").ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_each_vendor_shape() {
        let text = "openai sk-proj-ABCDEFGHIJKLMNOPQRSTUVWX gemini AIzaSyA1234567890abcdefghijklmnopqrstu groq gsk_abcdefghijklmnopqrstuvwx";
        let redacted = redact_provider_keys(text);
        assert!(!redacted.contains("sk-proj"));
        assert!(!redacted.contains("AIza"));
        assert!(!redacted.contains("gsk_"));
        assert_eq!(redacted.matches(REDACTION_PLACEHOLDER).count(), 3);
    }

    #[test]
    fn test_leaves_ordinary_text_alone() {
        let text = "upstream returned 503: service unavailable";
        assert_eq!(redact_provider_keys(text), text);
    }

    #[test]
    fn test_redacts_bearer_and_query_keys() {
        let text = "GET https://example.test/v1?key=abc123&alt=json with Bearer tok.en-value";
        let redacted = redact_provider_keys(text);
        assert!(redacted.contains("?key=[REDACTED]&alt=json"));
        assert!(redacted.contains("Bearer [REDACTED]"));
        assert!(!redacted.contains("abc123"));
    }

    #[test]
    fn test_selective_features() {
        let text = "Bearer abcdef sk-ABCDEFGHIJKLMNOPQRSTUV";
        let only_keys = redact_with(text, RedactionFeatures::PROVIDER_KEYS);
        assert!(only_keys.contains("Bearer abcdef"));
        assert!(!only_keys.contains("sk-ABCDEF"));
    }

    #[test]
    fn test_header_redaction() {
        let headers = [
            ("Authorization", "Bearer device"),
            ("x-openai-key", "sk-secret"),
            ("content-type", "application/json"),
        ];
        let redacted = redact_headers(headers);
        assert_eq!(redacted[0].1, REDACTION_PLACEHOLDER);
        assert_eq!(redacted[1].1, REDACTION_PLACEHOLDER);
        assert_eq!(redacted[2].1, "application/json");
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint_token("device-123");
        assert_eq!(a, fingerprint_token("device-123"));
        assert_ne!(a, fingerprint_token("device-124"));
        assert_eq!(a.len(), 12);
    }
}
