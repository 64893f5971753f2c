//! Normalization of the model's JSON reply.

use super::types::SummarizeError;
use serde_json::Value;

/// Fields extracted from a structured reply, with absent keys defaulted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StructuredReply {
    /// Summary text (`""` when absent).
    pub summary: String,
    /// Key points (empty when absent).
    pub key_points: Vec<String>,
    /// Word count (`0` when absent or not a count).
    pub word_count: u64,
}

/// Parse the model's JSON text.
///
/// Only key presence is checked: values of an unexpected shape are coerced rather than
/// rejected, and unknown keys are ignored. Fails only on invalid JSON or a non-object reply.
pub fn parse_structured_reply(raw: &str) -> Result<StructuredReply, SummarizeError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|error| SummarizeError::MalformedReply(error.to_string()))?;
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(SummarizeError::MalformedReply(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(StructuredReply {
        summary: fields.remove("summary").map(text_value).unwrap_or_default(),
        key_points: fields
            .remove("key_points")
            .map(list_value)
            .unwrap_or_default(),
        word_count: fields
            .remove("word_count")
            .map(count_value)
            .unwrap_or_default(),
    })
}

fn text_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

// Strings are kept as-is, other elements are rendered as JSON, nulls are dropped.
fn list_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(text_value)
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text],
        _ => Vec::new(),
    }
}

// Accepts non-negative integers, integral floats, and numeric strings; anything else is 0.
fn count_value(value: Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(integral_count))
            .unwrap_or_default(),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral_count))
                .unwrap_or_default()
        }
        _ => 0,
    }
}

fn integral_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
