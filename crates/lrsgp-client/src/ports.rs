//! HTTP transport port
//!
//! `GpClient` talks to the network only through [`HttpTransport`], so the
//! request/response protocol can be exercised against an in-process stub.

use async_trait::async_trait;
use lrsgp_core::error::Result;
use std::fmt;

/// Content type of POSTed parameter bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMethod::Get => f.write_str("GET"),
            RequestMethod::Post => f.write_str("POST"),
        }
    }
}

/// A fully built request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpRequest {
    pub method: RequestMethod,
    /// Target URL; includes the query string for GET requests
    pub url: String,
    /// Form-encoded parameters for POST requests
    pub body: Option<String>,
}

impl GpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Post,
            url: url.into(),
            body: Some(body.into()),
        }
    }

    /// `Content-Type` header value, if the request carries a body
    pub fn content_type(&self) -> Option<&'static str> {
        match self.method {
            RequestMethod::Post => Some(FORM_CONTENT_TYPE),
            RequestMethod::Get => None,
        }
    }
}

/// Raw response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl GpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Port for sending one HTTP request
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the status line and body.
    ///
    /// Non-success statuses are returned as responses, not errors. Errors are
    /// reserved for failures to obtain a response at all.
    async fn send(&self, request: GpRequest) -> Result<GpResponse>;
}
