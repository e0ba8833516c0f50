//! Input schema derivation and structural argument validation.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::tools::types::ToolError;

/// Field name reported when the payload itself is malformed.
pub const ARGUMENTS_FIELD: &str = "arguments";

/// Derives the advertised `inputSchema` for an argument struct.
///
/// Sub-schemas are inlined so clients never have to resolve `$ref`s, and
/// the root always carries `properties` and `required`, even when empty.
pub fn input_schema_for<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.option_nullable = false;
        s.option_add_null_type = false;
        s.meta_schema = None;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();

    let mut schema = serde_json::to_value(&root.schema).unwrap_or_else(|_| json!({}));
    if let Some(object) = schema.as_object_mut() {
        object.remove("title");
        object.remove("description");
        object.insert("type".to_string(), json!("object"));
        object
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        object.entry("required").or_insert_with(|| json!([]));
    }
    schema
}

/// Checks `args` against `schema`, returning the argument object on success.
///
/// Absent or null arguments count as an empty object. Fields the schema does
/// not declare are ignored.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<Map<String, Value>, ToolError> {
    let object = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(ToolError::invalid(
                ARGUMENTS_FIELD,
                format!("expected an object, got {}", json_type_name(other)),
            ))
        }
    };

    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for field in required.iter().filter_map(Value::as_str) {
        if !object.contains_key(field) {
            return Err(ToolError::invalid(field, "missing required field"));
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(object);
    };

    for (field, property) in properties {
        let Some(value) = object.get(field) else {
            continue;
        };

        if let Some(expected) = property.get("type").and_then(Value::as_str) {
            if !matches_type(expected, value) {
                return Err(ToolError::invalid(
                    field,
                    format!("expected {expected}, got {}", json_type_name(value)),
                ));
            }
        }

        if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                let names: Vec<String> = allowed
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect();
                return Err(ToolError::invalid(
                    field,
                    format!("expected one of: {}", names.join(", ")),
                ));
            }
        }
    }

    Ok(object)
}

/// Deserializes a validated argument object into its typed form.
pub fn parse_arguments<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ToolError::invalid(ARGUMENTS_FIELD, e.to_string()))
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
