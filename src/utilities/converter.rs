//! Best-effort extraction of JSON objects from free-form model output.
//!
//! Models are asked for JSON but routinely wrap it in prose or code fences.
//! The extraction takes everything from the first `{` to the last `}` and
//! parses that span; nothing smarter is attempted.

use serde_json::{Map, Value};
use thiserror::Error;

/// Error raised when no JSON object can be recovered from a text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConverterError {
    pub message: String,
}

impl ConverterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Return the span from the first `{` to the last `}` (inclusive), if any.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extract and parse the JSON object embedded in `text`.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ConverterError> {
    let span = extract_json_span(text)
        .ok_or_else(|| ConverterError::new("No valid JSON found in result"))?;

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ConverterError::new(format!(
            "Expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(ConverterError::new(format!("JSON parse error: {}", e))),
    }
}
