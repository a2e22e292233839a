//! Error types and utilities for the wastewater bot

use thiserror::Error;

/// Result type alias for wwgraph operations
pub type Result<T> = std::result::Result<T, WwgraphError>;

/// Main error type for wwgraph operations
#[derive(Error, Debug)]
pub enum WwgraphError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP transport failures)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Metro Vancouver data portal errors (bad status, malformed envelopes)
    #[error("Portal error: {message}")]
    Portal {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single platform's publish attempt failed
    #[error("Publish error ({platform}): {message}")]
    Publish {
        platform: String,
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph rendering and figure composition errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl WwgraphError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new portal error
    pub fn portal(msg: impl Into<String>) -> Self {
        Self::Portal {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new portal error with an HTTP status code
    pub fn portal_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Portal {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new portal error with source
    pub fn portal_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Portal {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new publish error for the named platform
    pub fn publish(platform: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Publish {
            platform: platform.into(),
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new publish error with an HTTP status code
    pub fn publish_with_status(
        platform: impl Into<String>,
        msg: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::Publish {
            platform: platform.into(),
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new publish error with source
    pub fn publish_with_source(
        platform: impl Into<String>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Publish {
            platform: platform.into(),
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to WwgraphError
impl From<reqwest::Error> for WwgraphError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from toml::de::Error to WwgraphError
impl From<toml::de::Error> for WwgraphError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to WwgraphError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for WwgraphError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let config_error = WwgraphError::config("missing section");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("missing section"));

        let portal_error = WwgraphError::portal_with_status("listing failed", 503);
        assert!(portal_error.to_string().contains("Portal error"));
        assert!(portal_error.to_string().contains("listing failed"));

        let publish_error = WwgraphError::publish_with_status("twitter", "upload rejected", 403);
        assert_eq!(
            publish_error.to_string(),
            "Publish error (twitter): upload rejected"
        );

        let validation_error = WwgraphError::validation_field("must not be empty", "access_token");
        assert!(validation_error.to_string().contains("Validation error"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let wrapped = WwgraphError::graph_with_source("failed to write figure", io_error);

        assert!(wrapped.to_string().contains("Graph error"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: WwgraphError = io_error.into();

        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"d": }"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let err: WwgraphError = serde_error.into();

        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= nonsense").unwrap_err();
        let err: WwgraphError = toml_error.into();

        assert!(err.to_string().contains("Configuration error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<()> {
            Err(WwgraphError::portal("no measurements"))
        }

        let error = returns_error().unwrap_err();
        assert!(error.to_string().contains("no measurements"));
    }
}
