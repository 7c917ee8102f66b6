use crate::error::{LrsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default task converting points to route events
pub const DEFAULT_POINT_TASK_NAME: &str = "Points to Route Events";

/// Default task converting polylines to route segments
pub const DEFAULT_LINES_TASK_NAME: &str = "Points to Route Segments";

/// URL length above which requests switch from GET to POST
pub const DEFAULT_MAX_URL_LENGTH: usize = 2000;

/// Constructor options for a geoprocessing client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpClientOptions {
    /// Base URL of the GP service, e.g. `https://example.com/arcgis/rest/services/LinearReferencing/GPServer`
    pub url: Option<String>,

    /// Asynchronous (`submitJob`) services; not supported
    #[serde(default)]
    pub async_mode: bool,

    pub point_task_name: Option<String>,

    pub lines_task_name: Option<String>,

    /// `None` or zero selects [`DEFAULT_MAX_URL_LENGTH`]
    pub max_url_length: Option<usize>,
}

impl GpClientOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered client configuration: defaults < file < environment < CLI
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub url: ConfigValue<Option<String>>,
    pub point_task_name: ConfigValue<String>,
    pub lines_task_name: ConfigValue<String>,
    pub max_url_length: ConfigValue<usize>,
    pub async_mode: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            url: ConfigValue::new(None, ConfigSource::Default),
            point_task_name: ConfigValue::new(
                DEFAULT_POINT_TASK_NAME.to_string(),
                ConfigSource::Default,
            ),
            lines_task_name: ConfigValue::new(
                DEFAULT_LINES_TASK_NAME.to_string(),
                ConfigSource::Default,
            ),
            max_url_length: ConfigValue::new(DEFAULT_MAX_URL_LENGTH, ConfigSource::Default),
            async_mode: ConfigValue::new(false, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| LrsError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| LrsError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.url {
            self.url.update(Some(url), ConfigSource::File);
        }

        if let Some(name) = file_config.point_task_name {
            self.point_task_name.update(name, ConfigSource::File);
        }

        if let Some(name) = file_config.lines_task_name {
            self.lines_task_name.update(name, ConfigSource::File);
        }

        if let Some(max_url_length) = file_config.max_url_length {
            self.max_url_length.update(max_url_length, ConfigSource::File);
        }

        if let Some(async_mode) = file_config.async_mode {
            self.async_mode.update(async_mode, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // LRSGP_URL
        if let Ok(url) = env::var("LRSGP_URL") {
            if !url.is_empty() {
                self.url.update(Some(url), ConfigSource::Environment);
            }
        }

        // LRSGP_POINT_TASK_NAME
        if let Ok(name) = env::var("LRSGP_POINT_TASK_NAME") {
            self.point_task_name.update(name, ConfigSource::Environment);
        }

        // LRSGP_LINES_TASK_NAME
        if let Ok(name) = env::var("LRSGP_LINES_TASK_NAME") {
            self.lines_task_name.update(name, ConfigSource::Environment);
        }

        // LRSGP_MAX_URL_LENGTH
        if let Ok(length_str) = env::var("LRSGP_MAX_URL_LENGTH") {
            match parse_max_url_length(&length_str) {
                Ok(length) => self.max_url_length.update(length, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LRSGP_MAX_URL_LENGTH value '{}': expected a positive integer",
                    length_str
                ),
            }
        }

        // LRSGP_ASYNC
        if let Ok(async_str) = env::var("LRSGP_ASYNC") {
            match parse_bool("async_mode", &async_str) {
                Ok(async_mode) => self.async_mode.update(async_mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid LRSGP_ASYNC value '{}': expected true or false",
                    async_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(url) = overrides.url {
            self.url.update(Some(url), ConfigSource::Cli);
        }

        if let Some(name) = overrides.point_task_name {
            self.point_task_name.update(name, ConfigSource::Cli);
        }

        if let Some(name) = overrides.lines_task_name {
            self.lines_task_name.update(name, ConfigSource::Cli);
        }

        if let Some(max_url_length) = overrides.max_url_length {
            self.max_url_length.update(max_url_length, ConfigSource::Cli);
        }
    }

    /// Client constructor options from the resolved values
    pub fn to_client_options(&self) -> GpClientOptions {
        GpClientOptions {
            url: self.url.value.clone(),
            async_mode: self.async_mode.value,
            point_task_name: Some(self.point_task_name.value.clone()),
            lines_task_name: Some(self.lines_task_name.value.clone()),
            max_url_length: Some(self.max_url_length.value),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "url".to_string(),
            (
                self.url.value.clone().unwrap_or_else(|| "(not set)".to_string()),
                self.url.source,
            ),
        );

        map.insert(
            "point_task_name".to_string(),
            (self.point_task_name.value.clone(), self.point_task_name.source),
        );

        map.insert(
            "lines_task_name".to_string(),
            (self.lines_task_name.value.clone(), self.lines_task_name.source),
        );

        map.insert(
            "max_url_length".to_string(),
            (self.max_url_length.value.to_string(), self.max_url_length.source),
        );

        map.insert(
            "async_mode".to_string(),
            (self.async_mode.value.to_string(), self.async_mode.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    url: Option<String>,
    point_task_name: Option<String>,
    lines_task_name: Option<String>,
    max_url_length: Option<usize>,
    async_mode: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub url: Option<String>,
    pub point_task_name: Option<String>,
    pub lines_task_name: Option<String>,
    pub max_url_length: Option<usize>,
}

/// Parse a URL length threshold from string
pub fn parse_max_url_length(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(length) if length > 0 => Ok(length),
        _ => Err(LrsError::ConfigInvalid {
            key: "max_url_length".to_string(),
            reason: format!("'{}' is not a positive integer", s),
        }),
    }
}

fn parse_bool(key: &str, s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(LrsError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("'{}' is not a boolean", s),
        }),
    }
}
