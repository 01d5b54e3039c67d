// ABOUTME: Pure prompt builders for initial generation and feedback-driven regeneration
// ABOUTME: System prompt is loaded at compile time; identical inputs always yield identical prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Everything in this module is side-effect free. The regeneration message
//! layout (dissatisfaction, feedback clauses, parameter deltas in the order
//! duration, focus, equipment, energy, then notes, then the closing directive)
//! is part of the provider contract; providers are prompt-sensitive.

use serde_json::{json, Value};
use workout_core::models::{FeedbackTag, GenerationContext, GenerationRequest};

use super::ChatMessage;

/// Workout coach system prompt
pub const WORKOUT_SYSTEM_PROMPT: &str = include_str!("workout_system.md");

const DISSATISFACTION: &str =
    "The user was not satisfied with the previous workout plan and wants a different one.";

const CLOSING_DIRECTIVE: &str =
    "Generate a complete new workout plan for today that follows the response schema exactly.";

/// System prompt for plan generation
#[must_use]
pub const fn system_prompt() -> &'static str {
    WORKOUT_SYSTEM_PROMPT
}

/// Natural-language clause for a feedback tag
#[must_use]
pub const fn feedback_clause(tag: FeedbackTag) -> &'static str {
    match tag {
        FeedbackTag::TooHard => {
            "It was too hard: lower the intensity and the total volume."
        }
        FeedbackTag::TooEasy => {
            "It was too easy: raise the intensity and the total volume."
        }
        FeedbackTag::DifferentExercises => {
            "They want different exercises: do not reuse the movements from the previous plan."
        }
        FeedbackTag::JustTryAgain => {
            "They did not give a specific reason: offer a fresh alternative with the same goals."
        }
    }
}

/// Initial prompt: structured JSON of request, context, and instructions
#[must_use]
pub fn build_initial_prompt(request: &GenerationRequest, context: &GenerationContext) -> String {
    let payload = json!({
        "request": request_summary(request),
        "context": context,
        "instructions": [
            "Create today's workout for this user.",
            "Fields in request take priority over the context.",
            "Return only the JSON object described by the response schema.",
        ],
    });
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

fn request_summary(request: &GenerationRequest) -> Value {
    json!({
        "timeMinutes": request.time_minutes,
        "focus": request.focus.as_deref().map(str::trim),
        "equipment": request.equipment,
        "energy": request.energy,
    })
}

/// Regeneration prompt narrating feedback, deltas, and notes
#[must_use]
pub fn build_regeneration_prompt(request: &GenerationRequest) -> String {
    let mut sections: Vec<String> = vec![DISSATISFACTION.to_owned()];

    let mut tags: Vec<FeedbackTag> = Vec::new();
    for tag in request.feedback.iter().flatten() {
        if !tags.contains(tag) {
            tags.push(*tag);
        }
    }
    if !tags.is_empty() {
        let clauses: Vec<&str> = tags.iter().map(|tag| feedback_clause(*tag)).collect();
        sections.push(format!("Feedback on the previous plan: {}", clauses.join(" ")));
    }

    let deltas = parameter_deltas(request);
    if !deltas.is_empty() {
        sections.push(format!("Requested changes:\n{}", deltas.join("\n")));
    }

    if let Some(notes) = request.trimmed_notes() {
        if deltas.is_empty() {
            sections.push(format!(
                "User notes. Treat these as the sole source of truth for what to change: \"{notes}\""
            ));
        } else {
            sections.push(format!(
                "User notes. Apply these as overrides on top of the previous plan and the requested changes: \"{notes}\""
            ));
        }
    }

    sections.push(CLOSING_DIRECTIVE.to_owned());
    sections.join("\n\n")
}

/// Concrete parameter deltas in fixed order: duration, focus, equipment, energy
fn parameter_deltas(request: &GenerationRequest) -> Vec<String> {
    let mut deltas = Vec::new();
    if let Some(minutes) = request.time_minutes {
        deltas.push(format!("- Duration: {minutes} minutes"));
    }
    if let Some(focus) = request.focus.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        deltas.push(format!("- Focus: {focus}"));
    }
    if let Some(equipment) = request.equipment.as_ref().filter(|e| !e.is_empty()) {
        deltas.push(format!("- Equipment: {}", equipment.join(", ")));
    }
    if let Some(energy) = request.energy {
        deltas.push(format!("- Energy: {energy}"));
    }
    deltas
}

/// Messages for one generation call
///
/// Providers with server-side chaining only need the regeneration prompt;
/// the others get the initial prompt and the regeneration prompt as two
/// user turns.
#[must_use]
pub fn build_conversation(
    request: &GenerationRequest,
    context: &GenerationContext,
    supports_chaining: bool,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt())];
    if request.is_regeneration() {
        if !supports_chaining {
            messages.push(ChatMessage::user(build_initial_prompt(request, context)));
        }
        messages.push(ChatMessage::user(build_regeneration_prompt(request)));
    } else {
        messages.push(ChatMessage::user(build_initial_prompt(request, context)));
    }
    messages
}
