// ABOUTME: JSON Schema documents describing the structured output each schema version requires
// ABOUTME: Strict JSON Schema for OpenAI-style APIs plus an OpenAPI-subset variant for Gemini
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{json, Map, Value};
use workout_core::models::SchemaVersion;

/// Schema name sent to APIs that label structured output formats
pub const SCHEMA_NAME: &str = "workout_plan";

fn energy_schema() -> Value {
    json!({"type": "string", "enum": ["easy", "moderate", "intense"]})
}

fn exercise_properties() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("name".to_owned(), json!({"type": "string"}));
    properties.insert("prescription".to_owned(), json!({"type": "string"}));
    properties.insert("detail".to_owned(), json!({"type": ["string", "null"]}));
    properties
}

fn strict_object(properties: Map<String, Value>) -> Value {
    let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn plan_properties(blocks: Value) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("focus".to_owned(), json!({"type": "string"}));
    properties.insert(
        "durationMinutes".to_owned(),
        json!({"type": "integer", "minimum": 1}),
    );
    properties.insert(
        "equipment".to_owned(),
        json!({"type": "array", "items": {"type": "string"}}),
    );
    properties.insert("source".to_owned(), json!({"type": "string"}));
    properties.insert("energy".to_owned(), energy_schema());
    properties.insert("summary".to_owned(), json!({"type": "string"}));
    properties.insert("blocks".to_owned(), blocks);
    properties
}

fn block_properties() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("title".to_owned(), json!({"type": "string"}));
    properties.insert(
        "durationMinutes".to_owned(),
        json!({"type": "integer", "minimum": 1}),
    );
    properties.insert("focus".to_owned(), json!({"type": "string"}));
    properties
}

/// Strict JSON Schema for the nested plan shape
#[must_use]
pub fn nested_plan_schema() -> Value {
    let mut block = block_properties();
    block.insert(
        "exercises".to_owned(),
        json!({"type": "array", "minItems": 1, "items": strict_object(exercise_properties())}),
    );
    let blocks = json!({"type": "array", "minItems": 1, "items": strict_object(block)});
    strict_object(plan_properties(blocks))
}

/// Strict JSON Schema for the flat plan shape
#[must_use]
pub fn flat_plan_schema() -> Value {
    let blocks = json!({
        "type": "array",
        "minItems": 1,
        "items": strict_object(block_properties()),
    });
    let mut exercise = exercise_properties();
    exercise.insert(
        "blockIndex".to_owned(),
        json!({"type": "integer", "minimum": 0}),
    );
    exercise.insert("order".to_owned(), json!({"type": "integer", "minimum": 0}));
    let mut properties = plan_properties(blocks);
    properties.insert(
        "exercises".to_owned(),
        json!({"type": "array", "minItems": 1, "items": strict_object(exercise)}),
    );
    strict_object(properties)
}

/// Strict JSON Schema for a version
#[must_use]
pub fn json_schema(version: SchemaVersion) -> Value {
    match version {
        SchemaVersion::Nested => nested_plan_schema(),
        SchemaVersion::Flat => flat_plan_schema(),
    }
}

/// Gemini `responseSchema` for a version
///
/// Gemini accepts an OpenAPI subset: no `additionalProperties`, no numeric
/// bounds on arrays, and nullability expressed with `nullable`.
#[must_use]
pub fn gemini_schema(version: SchemaVersion) -> Value {
    to_openapi_subset(json_schema(version))
}

fn to_openapi_subset(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, field) in map {
                match key.as_str() {
                    "additionalProperties" | "minItems" | "minimum" => {}
                    "type" => {
                        if let Value::Array(types) = &field {
                            let concrete = types.iter().find(|t| t.as_str() != Some("null"));
                            out.insert(
                                "type".to_owned(),
                                concrete.cloned().unwrap_or_else(|| json!("string")),
                            );
                            if types.iter().any(|t| t.as_str() == Some("null")) {
                                out.insert("nullable".to_owned(), Value::Bool(true));
                            }
                        } else {
                            out.insert(key, field);
                        }
                    }
                    _ => {
                        out.insert(key, to_openapi_subset(field));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(to_openapi_subset).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_schema_requires_every_property() {
        let schema = nested_plan_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 7);
        assert_eq!(schema["additionalProperties"], false);
        let exercise = &schema["properties"]["blocks"]["items"]["properties"]["exercises"]["items"];
        assert!(exercise["required"]
            .as_array()
            .unwrap()
            .contains(&json!("detail")));
    }

    #[test]
    fn test_flat_schema_has_sibling_exercises() {
        let schema = flat_plan_schema();
        assert!(schema["properties"]["blocks"]["items"]["properties"]
            .get("exercises")
            .is_none());
        assert_eq!(
            schema["properties"]["exercises"]["items"]["properties"]["blockIndex"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_gemini_variant_drops_unsupported_keywords() {
        let schema = gemini_schema(SchemaVersion::Nested);
        let text = schema.to_string();
        assert!(!text.contains("additionalProperties"));
        assert!(!text.contains("minItems"));
        let detail =
            &schema["properties"]["blocks"]["items"]["properties"]["exercises"]["items"]["properties"]["detail"];
        assert_eq!(detail["type"], "string");
        assert_eq!(detail["nullable"], true);
    }
}
