//! Parse function-call arguments into a flat field map

use crate::error::ExtractorError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse the raw argument string of a function call
///
/// The arguments must be a JSON object. Scalar values are kept as strings
/// (numbers and booleans use their JSON text). `null` values are treated as
/// absent. Nested arrays and objects are not part of a flat mapping and fail
/// the parse.
pub fn parse_function_arguments(
    arguments: &str,
) -> Result<BTreeMap<String, String>, ExtractorError> {
    let json_str = extract_json(arguments)?;

    let json: Value = serde_json::from_str(json_str)?;

    let object = match json {
        Value::Object(map) => map,
        other => {
            return Err(ExtractorError::MalformedArguments(format!(
                "Expected JSON object, got {}",
                json_type(&other)
            )))
        }
    };

    let mut fields = BTreeMap::new();
    for (key, value) in object {
        match value {
            Value::String(s) => {
                fields.insert(key, s);
            }
            Value::Number(n) => {
                fields.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                fields.insert(key, b.to_string());
            }
            Value::Null => {}
            nested => {
                return Err(ExtractorError::MalformedArguments(format!(
                    "field '{}' is {}, expected a scalar",
                    key,
                    json_type(&nested)
                )));
            }
        }
    }

    Ok(fields)
}

/// Extract JSON from arguments, handling markdown code blocks
fn extract_json(arguments: &str) -> Result<&str, ExtractorError> {
    let trimmed = arguments.trim();

    if trimmed.is_empty() {
        return Err(ExtractorError::MalformedArguments(
            "Empty arguments".to_string(),
        ));
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip the opening fence line (``` or ```json) and the closing fence
        let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
        let body = body.trim_end().strip_suffix("```").unwrap_or(body);
        return Ok(body.trim());
    }

    Ok(trimmed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
