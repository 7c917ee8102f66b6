//! Error types for the LRS geoprocessing client

use thiserror::Error;

use crate::models::GpServiceError;

#[derive(Debug, Error)]
pub enum LrsError {
    // Validation errors
    #[error("Invalid type for {field}: expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    // Request errors
    #[error("Request to {url} failed with HTTP {status} {status_text}")]
    Transport {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("GP service error: {0}")]
    Service(GpServiceError),

    #[error("HTTP error: {0}")]
    Http(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LrsError {
    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }

    /// True for errors raised by a field assignment
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::InvalidValue { .. })
    }

    /// True for errors caused by missing or malformed client configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. } | Self::ConfigInvalid { .. } | Self::NotImplemented { .. }
        )
    }

    /// HTTP status of a transport error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The structured error reported by the GP service, if any
    pub fn service_error(&self) -> Option<&GpServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LrsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LrsError>;
