//! Normalization of `execute` responses

use lrsgp_core::error::{LrsError, Result};
use lrsgp_core::models::{FeatureSet, GpExecuteResponse, GpServiceError};
use serde_json::Value;

use crate::ports::GpResponse;

/// Turn a raw response into the single output feature set.
///
/// `url` is the full request URL, reported back on HTTP failures.
pub fn parse_execute_response(url: &str, response: GpResponse) -> Result<FeatureSet> {
    if !response.is_success() {
        return Err(LrsError::Transport {
            url: url.to_string(),
            status: response.status,
            status_text: response.status_text,
        });
    }

    let mut body: Value = serde_json::from_str(&response.body)
        .map_err(|e| LrsError::Serialization(format!("Failed to parse GP response: {}", e)))?;

    // An `error` member wins over everything else in the body.
    if let Some(error) = body.get_mut("error").map(Value::take).filter(|e| !e.is_null()) {
        return Err(LrsError::Service(GpServiceError::from_value(error)));
    }

    let body: GpExecuteResponse = serde_json::from_value(body)
        .map_err(|e| LrsError::Serialization(format!("Unexpected GP response shape: {}", e)))?;

    body.results
        .and_then(|results| results.into_iter().next())
        .map(|result| result.value)
        .ok_or_else(|| LrsError::Serialization("GP response contained no results".to_string()))
}
