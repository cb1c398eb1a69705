//! Validate tool call arguments against the tool's JSON Schema before execution.

use crate::error::RelistaError;

/// Validate tool arguments against a JSON Schema.
///
/// Performs top-level validation: schema type check, required field
/// presence, property types, and string enum membership. Nested schemas are
/// not descended into.
pub fn validate_arguments(
    tool_name: &str,
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), RelistaError> {
    check(args, schema).map_err(|message| RelistaError::ToolArgument {
        tool_name: tool_name.to_string(),
        message,
    })
}

fn check(args: &serde_json::Value, schema: &serde_json::Value) -> Result<(), String> {
    if let Some(schema_type) = schema.get("type").and_then(|v| v.as_str()) {
        if schema_type == "object" && !args.is_object() {
            return Err(format!(
                "expected object arguments, got {}",
                json_type_name(args)
            ));
        }
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|field| field.as_str()) {
            if !obj.contains_key(name) {
                return Err(format!("missing required field '{name}'"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };

    for (key, value) in obj {
        let Some(prop_schema) = properties.get(key) else {
            continue;
        };
        if let Some(expected_type) = prop_schema.get("type").and_then(|v| v.as_str()) {
            if !value_matches_type(value, expected_type) {
                return Err(format!(
                    "field '{key}' expected type '{expected_type}', got {}",
                    json_type_name(value)
                ));
            }
        }
        if let Some(allowed) = prop_schema.get("enum").and_then(|v| v.as_array()) {
            if !allowed.contains(value) {
                return Err(format!("field '{key}' must be one of {}", serde_json::Value::from(allowed.clone())));
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
