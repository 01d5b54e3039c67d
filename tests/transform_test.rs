// ABOUTME: Integration tests for the schema transformer and version selection
// ABOUTME: Nested and flat payloads, identifier generation, rejection cases, and selector rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::sample_llm_plan;
use serde_json::{json, Value};
use workout_core::models::{SchemaVersion, TodayPlan};
use workout_planner::transform::{
    SchemaSelector, SchemaTransformer, TransformError, TransformHooks, TransformOutcome,
};

fn flat_payload(exercises: Value) -> Value {
    json!({
        "focus": "full body",
        "durationMinutes": 25,
        "equipment": ["bodyweight"],
        "source": "ai",
        "energy": "easy",
        "summary": "Short circuit.",
        "blocks": [
            {"title": "Warm-up", "durationMinutes": 5, "focus": "mobility"},
            {"title": "Circuit", "durationMinutes": 20, "focus": "full body"}
        ],
        "exercises": exercises
    })
}

fn without_ids(plan: &TodayPlan) -> Value {
    let mut value = serde_json::to_value(plan).unwrap();
    value.as_object_mut().unwrap().remove("id");
    for block in value["blocks"].as_array_mut().unwrap() {
        block.as_object_mut().unwrap().remove("id");
        for exercise in block["exercises"].as_array_mut().unwrap() {
            exercise.as_object_mut().unwrap().remove("id");
        }
    }
    value
}

// ============================================================================
// Nested
// ============================================================================

#[test]
fn test_nested_plan_gets_unique_identifiers() {
    let transformer = SchemaTransformer::standard();
    let raw = serde_json::to_value(sample_llm_plan()).unwrap();

    let (plan, version) = transformer
        .transform(SchemaVersion::Nested, raw)
        .into_result()
        .unwrap();

    assert_eq!(version, SchemaVersion::Nested);
    assert_eq!(plan.blocks.len(), 3);
    let counts: Vec<usize> = plan.blocks.iter().map(|b| b.exercises.len()).collect();
    assert_eq!(counts, [1, 2, 1]);

    let mut ids = HashSet::new();
    assert!(ids.insert(plan.id.clone()));
    for block in &plan.blocks {
        assert!(!block.id.is_empty());
        assert!(ids.insert(block.id.clone()));
        for exercise in &block.exercises {
            assert!(!exercise.id.is_empty());
            assert!(ids.insert(exercise.id.clone()));
        }
    }
}

#[test]
fn test_transform_twice_differs_only_in_identifiers() {
    let transformer = SchemaTransformer::standard();
    let raw = serde_json::to_value(sample_llm_plan()).unwrap();

    let (first, _) = transformer
        .transform(SchemaVersion::Nested, raw.clone())
        .into_result()
        .unwrap();
    let (second, _) = transformer
        .transform(SchemaVersion::Nested, raw)
        .into_result()
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(without_ids(&first), without_ids(&second));
}

#[test]
fn test_fenced_text_with_string_numbers_is_repaired() {
    let mut raw = serde_json::to_value(sample_llm_plan()).unwrap();
    raw["durationMinutes"] = json!("30");
    raw["blocks"][0]["durationMinutes"] = json!(5.0);
    let text = format!("```json\n{raw}\n```");

    let outcome = SchemaTransformer::standard().transform_text(SchemaVersion::Nested, &text);

    let (plan, _) = outcome.into_result().unwrap();
    assert_eq!(plan.duration_minutes, 30);
    assert_eq!(plan.blocks[0].duration_minutes, 5);
}

#[test]
fn test_block_without_exercises_is_rejected() {
    let mut raw = serde_json::to_value(sample_llm_plan()).unwrap();
    raw["blocks"][2]["exercises"] = json!([]);

    let outcome = SchemaTransformer::standard().transform(SchemaVersion::Nested, raw);

    assert!(!outcome.is_success());
    assert_eq!(outcome.schema_version(), SchemaVersion::Nested);
}

#[test]
fn test_non_json_text_is_a_failure_value() {
    let outcome = SchemaTransformer::standard().transform_text(SchemaVersion::Nested, "sorry!");
    assert!(matches!(
        outcome,
        TransformOutcome::Failure {
            error: TransformError::NotJson(_),
            ..
        }
    ));
}

// ============================================================================
// Flat
// ============================================================================

#[test]
fn test_flat_payload_is_regrouped_by_order() {
    let raw = flat_payload(json!([
        {"blockIndex": 1, "order": 2, "name": "Lunge", "prescription": "3 x 10"},
        {"blockIndex": 0, "order": 0, "name": "Cat-cow", "prescription": "1 x 60 s"},
        {"blockIndex": 1, "order": 1, "name": "Squat", "prescription": "3 x 12"}
    ]));

    let (plan, version) = SchemaTransformer::standard()
        .transform(SchemaVersion::Flat, raw)
        .into_result()
        .unwrap();

    assert_eq!(version, SchemaVersion::Flat);
    assert_eq!(plan.blocks[0].exercises[0].name, "Cat-cow");
    let circuit: Vec<&str> = plan.blocks[1]
        .exercises
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(circuit, ["Squat", "Lunge"]);
}

#[test]
fn test_flat_out_of_range_block_index_fails() {
    let raw = flat_payload(json!([
        {"blockIndex": 0, "order": 0, "name": "Cat-cow", "prescription": "1 x 60 s"},
        {"blockIndex": 2, "order": 0, "name": "Squat", "prescription": "3 x 12"}
    ]));
    assert!(!SchemaTransformer::standard()
        .transform(SchemaVersion::Flat, raw)
        .is_success());
}

#[test]
fn test_flat_duplicate_order_fails() {
    let raw = flat_payload(json!([
        {"blockIndex": 0, "order": 0, "name": "Cat-cow", "prescription": "1 x 60 s"},
        {"blockIndex": 1, "order": 1, "name": "Squat", "prescription": "3 x 12"},
        {"blockIndex": 1, "order": 1, "name": "Lunge", "prescription": "3 x 10"}
    ]));
    assert!(!SchemaTransformer::standard()
        .transform(SchemaVersion::Flat, raw)
        .is_success());
}

#[test]
fn test_flat_block_without_exercises_fails() {
    let raw = flat_payload(json!([
        {"blockIndex": 1, "order": 0, "name": "Squat", "prescription": "3 x 12"}
    ]));
    assert!(!SchemaTransformer::standard()
        .transform(SchemaVersion::Flat, raw)
        .is_success());
}

#[test]
fn test_flat_enum_expansion_hook_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let transformer = SchemaTransformer::standard().with_flat_enum_expansion(Arc::new(
        move |raw: &mut Value| {
            counter.fetch_add(1, Ordering::SeqCst);
            if raw["energy"] == "e" {
                raw["energy"] = json!("easy");
            }
        },
    ));
    let mut raw = flat_payload(json!([
        {"blockIndex": 0, "order": 0, "name": "Cat-cow", "prescription": "1 x 60 s"},
        {"blockIndex": 1, "order": 0, "name": "Squat", "prescription": "3 x 12"}
    ]));
    raw["energy"] = json!("e");

    assert!(transformer.transform(SchemaVersion::Flat, raw).is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unregistered_version_fails() {
    let raw = serde_json::to_value(sample_llm_plan()).unwrap();
    let outcome = SchemaTransformer::empty().transform(SchemaVersion::Nested, raw);
    assert!(matches!(
        outcome,
        TransformOutcome::Failure {
            error: TransformError::Unregistered(SchemaVersion::Nested),
            ..
        }
    ));
}

fn reject_everything(_raw: Value, _hooks: &TransformHooks) -> Result<TodayPlan, TransformError> {
    Err(TransformError::InvalidField {
        field: "summary".to_owned(),
        message: "rejected by custom transform".to_owned(),
    })
}

#[test]
fn test_custom_transform_registration() {
    let transformer = SchemaTransformer::empty().with_transform(SchemaVersion::Flat, reject_everything);
    assert_eq!(transformer.registered_versions(), vec![SchemaVersion::Flat]);
    assert_eq!(
        SchemaTransformer::standard().registered_versions(),
        vec![SchemaVersion::Nested, SchemaVersion::Flat]
    );

    let raw = serde_json::to_value(sample_llm_plan()).unwrap();
    let replaced = SchemaTransformer::standard().with_transform(SchemaVersion::Nested, reject_everything);
    match replaced.transform(SchemaVersion::Nested, raw) {
        TransformOutcome::Failure {
            error: TransformError::InvalidField { field, .. },
            schema_version,
        } => {
            assert_eq!(field, "summary");
            assert_eq!(schema_version, SchemaVersion::Nested);
        }
        other => panic!("expected custom rejection, got {other:?}"),
    }
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_single_supported_version_always_wins() {
    let selector = SchemaSelector::new().with_size_table(vec![
        (SchemaVersion::Nested, 10_000),
        (SchemaVersion::Flat, 10),
    ]);
    assert_eq!(
        selector.select(&[SchemaVersion::Nested], None),
        SchemaVersion::Nested
    );
}

#[test]
fn test_caller_override_beats_size_table() {
    let selector = SchemaSelector::new().with_size_table(vec![
        (SchemaVersion::Nested, 10_000),
        (SchemaVersion::Flat, 10),
    ]);
    assert_eq!(
        selector.select(&SchemaVersion::ALL, Some(SchemaVersion::Nested)),
        SchemaVersion::Nested
    );
    assert_eq!(selector.select(&SchemaVersion::ALL, None), SchemaVersion::Flat);
}

#[test]
fn test_env_override_only_when_supported() {
    let selector = SchemaSelector::new().with_env_override(Some("flat"));
    assert_eq!(selector.env_override(), Some(SchemaVersion::Flat));
    assert_eq!(selector.select(&SchemaVersion::ALL, None), SchemaVersion::Flat);
    assert_eq!(
        selector.select(&[SchemaVersion::Nested], None),
        SchemaVersion::Nested
    );

    let ignored = SchemaSelector::new().with_env_override(Some("compressed"));
    assert!(ignored.env_override().is_none());
}
