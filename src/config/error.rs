//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Inference endpoint must be an http(s) URL")]
    InvalidEndpoint,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Retry count {0} exceeds the maximum of 10")]
    InvalidRetryCount(u32),

    #[error("Layout spacing must be finite and positive")]
    InvalidSpacing,

    #[error("Zoom step must be greater than 1")]
    InvalidZoomStep,

    #[error("Double-click threshold must be positive")]
    InvalidClickThreshold,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
