// ABOUTME: Per-device state stores for generation status and completed-session history
// ABOUTME: Async store traits with in-memory DashMap implementations and explicit test reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Stores are injected behind traits so a networked backend can replace the
//! in-memory maps. Every read returns an owned clone; callers can never reach
//! into stored state through a returned value.

mod generation;
mod sessions;

pub use generation::{GenerationStore, InMemoryGenerationStore};
pub use sessions::{InMemorySessionStore, SessionHistory, SessionStore};
