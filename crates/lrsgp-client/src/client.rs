//! Client for the linear referencing geoprocessing service

use lrsgp_core::config::{
    GpClientOptions, DEFAULT_LINES_TASK_NAME, DEFAULT_MAX_URL_LENGTH, DEFAULT_POINT_TASK_NAME,
};
use lrsgp_core::error::{LrsError, Result};
use lrsgp_core::models::{FeatureSet, GpParameters};
use lrsgp_core::query::encode_component;
use std::fmt;
use std::sync::Arc;

use crate::http::ReqwestTransport;
use crate::ports::{GpRequest, HttpTransport};
use crate::response::parse_execute_response;
use crate::transport::build_request;

/// The two geoprocessing tasks exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpTask {
    /// Locate points along routes
    RouteEvents,
    /// Locate line segments along routes
    RouteSegments,
}

impl GpTask {
    /// Route a free-form task name: anything mentioning "route segment"
    /// (case-insensitive, optional single whitespace) is `RouteSegments`,
    /// everything else `RouteEvents`.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let mentions_segments = lower.match_indices("route").any(|(index, _)| {
            let rest = &lower[index + "route".len()..];
            let rest = match rest.chars().next() {
                Some(c) if c.is_whitespace() => &rest[c.len_utf8()..],
                _ => rest,
            };
            rest.starts_with("segment")
        });

        if mentions_segments {
            GpTask::RouteSegments
        } else {
            GpTask::RouteEvents
        }
    }
}

impl fmt::Display for GpTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpTask::RouteEvents => f.write_str("route events"),
            GpTask::RouteSegments => f.write_str("route segments"),
        }
    }
}

/// Synchronous (`execute`) client for a linear referencing GP service.
///
/// Configuration is fixed at construction apart from the GET/POST threshold.
/// Each call issues exactly one HTTP request; there is no retry or caching.
/// Dropping the returned future abandons the request.
#[derive(Clone)]
pub struct GpClient {
    /// Service base URL without trailing slash
    url: String,
    point_task_name: String,
    lines_task_name: String,
    max_url_length: usize,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for GpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpClient")
            .field("url", &self.url)
            .field("point_task_name", &self.point_task_name)
            .field("lines_task_name", &self.lines_task_name)
            .field("max_url_length", &self.max_url_length)
            .finish_non_exhaustive()
    }
}

impl GpClient {
    /// Create a client that sends requests with `reqwest`
    pub fn new(options: GpClientOptions) -> Result<Self> {
        Self::with_transport(options, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client over a custom transport
    pub fn with_transport(options: GpClientOptions, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let url = options
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| LrsError::ConfigMissing { key: "url".to_string() })?;
        let url = url.strip_suffix('/').unwrap_or(url).to_string();

        if options.async_mode {
            return Err(LrsError::NotImplemented {
                feature: "asynchronous GP jobs (submitJob)".to_string(),
            });
        }

        let max_url_length = match options.max_url_length {
            Some(length) if length > 0 => length,
            _ => DEFAULT_MAX_URL_LENGTH,
        };

        Ok(Self {
            url,
            point_task_name: options
                .point_task_name
                .unwrap_or_else(|| DEFAULT_POINT_TASK_NAME.to_string()),
            lines_task_name: options
                .lines_task_name
                .unwrap_or_else(|| DEFAULT_LINES_TASK_NAME.to_string()),
            max_url_length,
            transport,
        })
    }

    /// The geoprocessing service URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the point location task
    pub fn point_task_url(&self) -> String {
        self.task_url(GpTask::RouteEvents)
    }

    /// URL of the line segment location task
    pub fn lines_task_url(&self) -> String {
        self.task_url(GpTask::RouteSegments)
    }

    pub fn task_url(&self, task: GpTask) -> String {
        let name = match task {
            GpTask::RouteEvents => &self.point_task_name,
            GpTask::RouteSegments => &self.lines_task_name,
        };
        format!("{}/{}/execute", self.url, encode_component(name))
    }

    /// Maximum URL length before switching from GET to POST
    pub fn max_url_length(&self) -> usize {
        self.max_url_length
    }

    pub fn set_max_url_length(&mut self, max_url_length: usize) {
        self.max_url_length = max_url_length;
    }

    /// Locate points along routes
    pub async fn points_to_route_events(&self, params: &GpParameters) -> Result<FeatureSet> {
        self.execute(GpTask::RouteEvents, params).await
    }

    /// Locate line segments along routes
    pub async fn points_to_route_segments(&self, params: &GpParameters) -> Result<FeatureSet> {
        self.execute(GpTask::RouteSegments, params).await
    }

    /// Run a task and return its output feature set
    pub async fn execute(&self, task: GpTask, params: &GpParameters) -> Result<FeatureSet> {
        let url = self.request_url(task, params)?;
        let request = build_request(&url, self.max_url_length);

        tracing::debug!(
            task = %task,
            method = %request.method,
            url_length = url.len(),
            max_url_length = self.max_url_length,
            "Dispatching GP request"
        );

        let response = self.transport.send(request).await?;

        tracing::debug!(task = %task, status = response.status, "Received GP response");

        parse_execute_response(&url, response)
    }

    /// The request `execute` would send, without sending it
    pub fn plan(&self, task: GpTask, params: &GpParameters) -> Result<GpRequest> {
        let url = self.request_url(task, params)?;
        Ok(build_request(&url, self.max_url_length))
    }

    fn request_url(&self, task: GpTask, params: &GpParameters) -> Result<String> {
        if params.input_features.is_none() {
            return Err(LrsError::InvalidValue {
                field: "Input_Features".to_string(),
                reason: "must be set before execution".to_string(),
            });
        }
        Ok(format!("{}?{}", self.task_url(task), params.to_url_search()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lrsgp_core::models::{create_feature_set, Geometry};

    const SERVICE_URL: &str =
        "http://example.com/arcgis/rest/services/Shared/LinearReferencing/GPServer";

    fn client() -> GpClient {
        GpClient::new(GpClientOptions::new(format!("{}/", SERVICE_URL))).unwrap()
    }

    #[test]
    fn test_task_urls() {
        let client = client();
        assert_eq!(client.url(), SERVICE_URL);
        assert_eq!(
            client.point_task_url(),
            format!("{}/Points%20to%20Route%20Events/execute", SERVICE_URL)
        );
        assert_eq!(
            client.lines_task_url(),
            format!("{}/Points%20to%20Route%20Segments/execute", SERVICE_URL)
        );
        assert_eq!(client.max_url_length(), 2000);
    }

    #[test]
    fn test_custom_task_names() {
        let options = GpClientOptions {
            point_task_name: Some("Locate/Points".to_string()),
            max_url_length: Some(0),
            ..GpClientOptions::new(SERVICE_URL)
        };
        let client = GpClient::new(options).unwrap();
        assert!(client.point_task_url().ends_with("/Locate%2FPoints/execute"));
        assert_eq!(client.max_url_length(), 2000);
    }

    #[test]
    fn test_missing_url() {
        let err = GpClient::new(GpClientOptions::default()).unwrap_err();
        assert!(matches!(err, LrsError::ConfigMissing { .. }));
        assert!(GpClient::new(GpClientOptions::new("  ")).is_err());
    }

    #[test]
    fn test_async_not_implemented() {
        let options = GpClientOptions {
            async_mode: true,
            ..GpClientOptions::new(SERVICE_URL)
        };
        let err = GpClient::new(options).unwrap_err();
        assert!(matches!(err, LrsError::NotImplemented { .. }));
    }

    #[test]
    fn test_task_from_name() {
        assert_eq!(GpTask::from_name("Points to Route Segments"), GpTask::RouteSegments);
        assert_eq!(GpTask::from_name("routesegment"), GpTask::RouteSegments);
        assert_eq!(GpTask::from_name("ROUTE SEGMENTS"), GpTask::RouteSegments);
        assert_eq!(GpTask::from_name("Points to Route Events"), GpTask::RouteEvents);
        assert_eq!(GpTask::from_name("route  segment"), GpTask::RouteEvents);
        assert_eq!(GpTask::from_name(""), GpTask::RouteEvents);
    }

    #[test]
    fn test_plan_requires_input_features() {
        let err = client().plan(GpTask::RouteEvents, &GpParameters::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_plan_get() {
        let fs = create_feature_set(vec![Geometry::point(1.0, 2.0)], None).unwrap();
        let request = client().plan(GpTask::RouteEvents, &GpParameters::with_input(fs)).unwrap();
        assert_eq!(request.method, crate::ports::RequestMethod::Get);
        assert!(request.url.starts_with(&format!(
            "{}/Points%20to%20Route%20Events/execute?Input_Features=",
            SERVICE_URL
        )));
        assert!(request.url.ends_with("&f=json&returnM=true&returnZ=true"));
    }
}
