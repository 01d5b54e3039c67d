// ABOUTME: Transform for the nested schema version, where blocks carry their exercises
// ABOUTME: Validates the loose plan, attaches generated identifiers, and re-validates the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;
use uuid::Uuid;
use workout_core::models::{Block, Exercise, LlmPlan, SchemaVersion, TodayPlan};

use super::validation::{validate_llm_plan, validate_today_plan};
use super::{TransformError, TransformHooks};

pub(super) fn transform_nested(
    raw: Value,
    _hooks: &TransformHooks,
) -> Result<TodayPlan, TransformError> {
    let plan: LlmPlan = serde_json::from_value(raw).map_err(|e| TransformError::Shape {
        version: SchemaVersion::Nested,
        message: e.to_string(),
    })?;
    finish_loose_plan(plan)
}

/// Validate a loose plan, attach identifiers, and check the canonical result
pub(super) fn finish_loose_plan(plan: LlmPlan) -> Result<TodayPlan, TransformError> {
    validate_llm_plan(&plan)?;
    let canonical = attach_ids(plan);
    validate_today_plan(&canonical)?;
    Ok(canonical)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn attach_ids(plan: LlmPlan) -> TodayPlan {
    TodayPlan {
        id: new_id(),
        focus: plan.focus,
        duration_minutes: plan.duration_minutes,
        equipment: plan.equipment,
        source: plan.source,
        energy: plan.energy,
        summary: plan.summary,
        blocks: plan
            .blocks
            .into_iter()
            .map(|block| Block {
                id: new_id(),
                title: block.title,
                duration_minutes: block.duration_minutes,
                focus: block.focus,
                exercises: block
                    .exercises
                    .into_iter()
                    .map(|exercise| Exercise {
                        id: new_id(),
                        name: exercise.name,
                        prescription: exercise.prescription,
                        detail: exercise.detail,
                    })
                    .collect(),
            })
            .collect(),
    }
}
