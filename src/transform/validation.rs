// ABOUTME: Structural checks for loose and canonical workout plans
// ABOUTME: Enforces non-empty blocks and exercises, positive durations, and unique identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use workout_core::models::{LlmPlan, TodayPlan};

use super::TransformError;

/// Check a loose plan beyond what deserialization enforces
pub(super) fn validate_llm_plan(plan: &LlmPlan) -> Result<(), TransformError> {
    if plan.duration_minutes == 0 {
        return Err(TransformError::field("durationMinutes", "must be positive"));
    }
    if plan.blocks.is_empty() {
        return Err(TransformError::field("blocks", "must contain at least one block"));
    }
    for (b, block) in plan.blocks.iter().enumerate() {
        if block.title.trim().is_empty() {
            return Err(TransformError::field(
                format!("blocks[{b}].title"),
                "must not be empty",
            ));
        }
        if block.duration_minutes == 0 {
            return Err(TransformError::field(
                format!("blocks[{b}].durationMinutes"),
                "must be positive",
            ));
        }
        if block.exercises.is_empty() {
            return Err(TransformError::field(
                format!("blocks[{b}].exercises"),
                "must contain at least one exercise",
            ));
        }
        for (e, exercise) in block.exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                return Err(TransformError::field(
                    format!("blocks[{b}].exercises[{e}].name"),
                    "must not be empty",
                ));
            }
        }
    }
    Ok(())
}

/// Check a canonical plan: structure, positive durations, and unique non-empty ids
///
/// # Errors
///
/// Returns the first violation found, naming the offending field.
pub fn validate_today_plan(plan: &TodayPlan) -> Result<(), TransformError> {
    let mut seen = HashSet::new();
    let mut check_id = |field: String, id: &str| {
        if id.is_empty() {
            Err(TransformError::field(field, "identifier must not be empty"))
        } else if seen.insert(id.to_owned()) {
            Ok(())
        } else {
            Err(TransformError::field(field, "identifier must be unique"))
        }
    };

    check_id("id".to_owned(), &plan.id)?;
    if plan.duration_minutes == 0 {
        return Err(TransformError::field("durationMinutes", "must be positive"));
    }
    if plan.blocks.is_empty() {
        return Err(TransformError::field("blocks", "must contain at least one block"));
    }
    for (b, block) in plan.blocks.iter().enumerate() {
        check_id(format!("blocks[{b}].id"), &block.id)?;
        if block.duration_minutes == 0 {
            return Err(TransformError::field(
                format!("blocks[{b}].durationMinutes"),
                "must be positive",
            ));
        }
        if block.exercises.is_empty() {
            return Err(TransformError::field(
                format!("blocks[{b}].exercises"),
                "must contain at least one exercise",
            ));
        }
        for (e, exercise) in block.exercises.iter().enumerate() {
            check_id(format!("blocks[{b}].exercises[{e}].id"), &exercise.id)?;
        }
    }
    Ok(())
}
