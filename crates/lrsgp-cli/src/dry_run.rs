use crate::output::OutputWriter;
use anyhow::Result;
use lrsgp_client::{GpRequest, GpTask};
use serde::Serialize;

/// A request that would be sent, shown in dry-run mode
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRequest {
    pub task: String,
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub max_url_length: usize,
}

impl PlannedRequest {
    pub fn new(task: GpTask, request: GpRequest, max_url_length: usize) -> Self {
        Self {
            task: task.to_string(),
            method: request.method.to_string(),
            content_type: request.content_type(),
            url: request.url,
            body: request.body,
            max_url_length,
        }
    }
}

/// Display the planned request in dry-run mode
pub fn display_planned_request(output: &OutputWriter, planned: &PlannedRequest) -> Result<()> {
    if output.is_json() {
        output.result(serde_json::json!({
            "dry_run": true,
            "planned_request": planned,
        }))?;
    } else {
        output.section("Planned Request (Dry Run)");
        output.kv("Task", &planned.task);
        output.kv("Method", &planned.method);
        output.kv("URL", &planned.url);
        if let Some(content_type) = planned.content_type {
            output.kv("Content-Type", content_type);
        }
        if let Some(body) = &planned.body {
            output.kv("Body", body);
        }
        output.info("\nNothing was sent. Run without --dry-run to execute the request.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_get_has_no_body() {
        let planned = PlannedRequest::new(
            GpTask::RouteEvents,
            GpRequest::get("http://example.com/execute?f=json"),
            2000,
        );

        assert_eq!(planned.method, "GET");
        let json = serde_json::to_value(&planned).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("content_type").is_none());
    }

    #[test]
    fn test_planned_post_carries_form_body() {
        let planned = PlannedRequest::new(
            GpTask::RouteSegments,
            GpRequest::post("http://example.com/execute", "f=json"),
            10,
        );

        assert_eq!(planned.task, "route segments");
        assert_eq!(planned.method, "POST");
        assert_eq!(planned.body.as_deref(), Some("f=json"));
        assert_eq!(planned.content_type, Some("application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_display_reports_success() {
        let planned = PlannedRequest::new(
            GpTask::RouteEvents,
            GpRequest::get("http://example.com/execute?f=json"),
            2000,
        );

        assert!(display_planned_request(&OutputWriter::new(true), &planned).is_ok());
        assert!(display_planned_request(&OutputWriter::new(false), &planned).is_ok());
    }
}
