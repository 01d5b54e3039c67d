// ABOUTME: Core data models for workout plan generation
// ABOUTME: Requests, generation context, loose and canonical plans, sessions, and device state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Every wire type uses camelCase field names. `TodayPlan` is the only plan
//! shape ever persisted or returned; `LlmPlan` and `LlmPlanFlat` are what
//! providers are asked to produce.

mod context;
mod plan;
mod request;
mod session;
mod state;

pub use context::{GenerationContext, Preferences, TrainingEnvironment, UserProfile};
pub use plan::{
    Block, Exercise, LlmBlock, LlmExercise, LlmFlatBlock, LlmFlatExercise, LlmPlan, LlmPlanFlat,
    SchemaVersion, TodayPlan,
};
pub use request::{Energy, FeedbackTag, GenerationRequest};
pub use session::{Load, SessionExercise, SetLog, WeightUnit, WorkoutSession, WorkoutSessionSummary};
pub use state::{GenerationPhase, GenerationState, GenerationStatus, TransformationMetadata};
