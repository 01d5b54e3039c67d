// ABOUTME: Light repair of provider output before schema validation
// ABOUTME: Strips markdown code fences and coerces integral floats or numeric strings to integers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Number, Value};

use super::TransformError;

/// Fields that must be integers in every schema version
const INTEGER_FIELDS: &[&str] = &["durationMinutes", "blockIndex", "order"];

/// Parse provider output text into JSON, tolerating a fenced code block
///
/// # Errors
///
/// Returns [`TransformError::NotJson`] for empty or unparseable text.
pub fn parse_payload_text(text: &str) -> Result<Value, TransformError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(TransformError::NotJson("empty payload".to_owned()));
    }
    serde_json::from_str(body).map_err(|e| TransformError::NotJson(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line (```json)
    let rest = rest.find('\n').map_or("", |newline| &rest[newline + 1..]);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Coerce integer fields given as integral floats or numeric strings
///
/// Values that are not integral are left as they are so validation can
/// reject them with a precise message.
pub fn coerce_integer_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if INTEGER_FIELDS.contains(&key.as_str()) {
                    if let Some(repaired) = as_integer(field) {
                        *field = Value::Number(repaired);
                    }
                } else {
                    coerce_integer_fields(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(coerce_integer_fields),
        _ => {}
    }
}

fn as_integer(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => None,
        Value::Number(n) => n.as_f64().and_then(integral_f64),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .map(Number::from)
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    }
}

fn integral_f64(f: f64) -> Option<Number> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(Number::from(f as i64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_fenced_block() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(parse_payload_text(text).unwrap(), json!({"a": 1}));
        assert_eq!(parse_payload_text("  {\"a\": 2} ").unwrap(), json!({"a": 2}));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(matches!(
            parse_payload_text("   "),
            Err(TransformError::NotJson(_))
        ));
        assert!(matches!(
            parse_payload_text("```json\n```"),
            Err(TransformError::NotJson(_))
        ));
    }

    #[test]
    fn test_coerces_nested_integer_fields() {
        let mut value = json!({
            "durationMinutes": "30",
            "focus": "12",
            "blocks": [{"durationMinutes": 10.0, "title": "Warm-up"}],
            "exercises": [{"blockIndex": "0", "order": 1.0}, {"blockIndex": 0, "order": 2.5}]
        });
        coerce_integer_fields(&mut value);
        assert_eq!(value["durationMinutes"], json!(30));
        assert_eq!(value["focus"], json!("12"));
        assert_eq!(value["blocks"][0]["durationMinutes"], json!(10));
        assert_eq!(value["exercises"][0]["blockIndex"], json!(0));
        assert_eq!(value["exercises"][0]["order"], json!(1));
        assert_eq!(value["exercises"][1]["order"], json!(2.5));
    }
}
