// ABOUTME: HTTP-adjacent helpers shared by routes, adapters, and the orchestrator
// ABOUTME: CORS setup, provider-key redaction for logs and errors, device-token fingerprints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS layer configuration
pub mod cors;
/// Provider-key redaction and token fingerprinting
pub mod redaction;

pub use cors::setup_cors;
pub use redaction::{fingerprint_token, redact_headers, redact_provider_keys};
