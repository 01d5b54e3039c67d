// ABOUTME: Application-wide constants shared between the server and its collaborators
// ABOUTME: Default ETAs, history limits, header names, and fallback plan values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Defaults used when configuration leaves a value unset
pub mod defaults {
    /// ETA recorded on the device state when a generation is submitted
    pub const GENERATION_ETA_SECONDS: u32 = 20;

    /// Number of logged sessions kept per device token
    pub const RECENT_SESSION_LIMIT: usize = 5;

    /// Number of recent sessions surfaced on the snapshot
    pub const SNAPSHOT_RECENT_SESSIONS: usize = 3;

    /// Workout length used when neither request nor context specify one
    pub const WORKOUT_MINUTES: u32 = 30;

    /// Focus used when neither request nor context specify one
    pub const WORKOUT_FOCUS: &str = "full body";

    /// Equipment used when neither request nor context specify any
    pub const WORKOUT_EQUIPMENT: &str = "bodyweight";

    /// HTTP timeout applied to provider calls
    pub const PROVIDER_TIMEOUT_SECS: u64 = 60;

    /// Listen port for the HTTP server
    pub const HTTP_PORT: u16 = 8081;
}

/// Request header names understood by the generate endpoint
pub mod headers {
    /// Explicit provider selection
    pub const AI_PROVIDER: &str = "x-ai-provider";
    /// `OpenAI` bring-your-own-key header
    pub const OPENAI_KEY: &str = "x-openai-key";
    /// Gemini bring-your-own-key header
    pub const GEMINI_KEY: &str = "x-gemini-key";
    /// Provider-agnostic bring-your-own-key header
    pub const AI_KEY: &str = "x-ai-key";
}

/// Plan `source` values
pub mod sources {
    /// Plan produced by an LLM provider
    pub const AI: &str = "ai";
    /// Plan synthesized locally without a provider
    pub const FALLBACK: &str = "fallback";
    /// Session logged by the user
    pub const MANUAL: &str = "manual";
}
