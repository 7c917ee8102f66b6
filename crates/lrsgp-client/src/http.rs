//! `reqwest` adapter for the HTTP transport port

use async_trait::async_trait;
use lrsgp_core::error::{LrsError, Result};
use reqwest::header::CONTENT_TYPE;

use crate::ports::{GpRequest, GpResponse, HttpTransport, RequestMethod};

/// `reqwest`-backed transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    /// HTTP client
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client (no timeout)
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-configured client, e.g. one with a timeout or proxy
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: GpRequest) -> Result<GpResponse> {
        let builder = match request.method {
            RequestMethod::Get => self.client.get(&request.url),
            RequestMethod::Post => self.client.post(&request.url),
        };

        let builder = match (request.content_type(), request.body) {
            (Some(content_type), Some(body)) => builder.header(CONTENT_TYPE, content_type).body(body),
            _ => builder,
        };

        let response = builder.send().await.map_err(|e| {
            LrsError::Http(format!("Failed to connect to {}: {}", request.url, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            LrsError::Http(format!("Failed to read response from {}: {}", request.url, e))
        })?;

        Ok(GpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        let transport = ReqwestTransport::new();
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = transport
            .send(GpRequest::get("http://127.0.0.1:9/GPServer/task/execute?f=json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LrsError::Http(_)));
    }
}
