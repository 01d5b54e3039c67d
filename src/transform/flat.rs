// ABOUTME: Transform for the flat schema version, where exercises reference blocks by index
// ABOUTME: Groups exercises under their blocks by index and order, then finishes as a nested plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use workout_core::models::{
    LlmBlock, LlmExercise, LlmFlatExercise, LlmPlan, LlmPlanFlat, SchemaVersion, TodayPlan,
};

use super::nested::finish_loose_plan;
use super::{TransformError, TransformHooks};

pub(super) fn transform_flat(
    mut raw: Value,
    hooks: &TransformHooks,
) -> Result<TodayPlan, TransformError> {
    (hooks.flat_enum_expansion)(&mut raw);

    let flat: LlmPlanFlat = serde_json::from_value(raw).map_err(|e| TransformError::Shape {
        version: SchemaVersion::Flat,
        message: e.to_string(),
    })?;
    finish_loose_plan(regroup(flat)?)
}

/// Rebuild the nested shape from the flat exercise list
fn regroup(flat: LlmPlanFlat) -> Result<LlmPlan, TransformError> {
    let block_count = flat.blocks.len();
    let mut groups: Vec<BTreeMap<i64, LlmFlatExercise>> = vec![BTreeMap::new(); block_count];
    let mut seen: HashSet<(usize, i64)> = HashSet::new();

    for (i, exercise) in flat.exercises.into_iter().enumerate() {
        let index = usize::try_from(exercise.block_index)
            .ok()
            .filter(|index| *index < block_count)
            .ok_or_else(|| {
                TransformError::field(
                    format!("exercises[{i}].blockIndex"),
                    format!(
                        "{} is out of range for {block_count} blocks",
                        exercise.block_index
                    ),
                )
            })?;
        if !seen.insert((index, exercise.order)) {
            return Err(TransformError::field(
                format!("exercises[{i}].order"),
                format!(
                    "duplicate order {} within block {index}",
                    exercise.order
                ),
            ));
        }
        groups[index].insert(exercise.order, exercise);
    }

    let blocks = flat
        .blocks
        .into_iter()
        .zip(groups)
        .enumerate()
        .map(|(b, (block, group))| {
            if group.is_empty() {
                return Err(TransformError::field(
                    format!("blocks[{b}].exercises"),
                    "no exercises reference this block",
                ));
            }
            Ok(LlmBlock {
                title: block.title,
                duration_minutes: block.duration_minutes,
                focus: block.focus,
                exercises: group
                    .into_values()
                    .map(|exercise| LlmExercise {
                        name: exercise.name,
                        prescription: exercise.prescription,
                        detail: exercise.detail,
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LlmPlan {
        focus: flat.focus,
        duration_minutes: flat.duration_minutes,
        equipment: flat.equipment,
        source: flat.source,
        energy: flat.energy,
        summary: flat.summary,
        blocks,
    })
}
