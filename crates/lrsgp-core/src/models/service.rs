//! Geoprocessing service response envelopes

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::models::FeatureSet;

/// Error object reported by the service in an otherwise successful HTTP response.
///
/// `code`, `message` and `details` are read leniently; the payload itself is
/// kept unchanged in `payload` and is what gets serialized back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GpServiceError {
    pub code: Option<i64>,
    pub message: String,
    pub details: Vec<String>,
    pub payload: Value,
}

impl GpServiceError {
    /// Read an `error` member of any shape
    pub fn from_value(payload: Value) -> Self {
        let (code, message, details) = match &payload {
            Value::Object(object) => (
                object.get("code").and_then(Value::as_i64),
                object.get("message").map(text).unwrap_or_default(),
                match object.get("details") {
                    Some(Value::Array(items)) => items.iter().map(text).collect(),
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![text(other)],
                },
            ),
            Value::Null => (None, String::new(), Vec::new()),
            other => (None, text(other), Vec::new()),
        };

        Self {
            code,
            message,
            details,
            payload,
        }
    }
}

/// Strings as-is, everything else in its JSON form
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Serialize for GpServiceError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GpServiceError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl fmt::Display for GpServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code)?,
            None => f.write_str(&self.message)?,
        }
        if !self.details.is_empty() {
            write!(f, ": {}", self.details.join("; "))?;
        }
        Ok(())
    }
}

/// One output parameter of a synchronous execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpResultParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    pub value: FeatureSet,
}

/// Body of an `execute` response: either `results` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GpExecuteResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<GpResultParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<GpServiceError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Value>,
}
