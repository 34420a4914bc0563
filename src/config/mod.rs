//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHOICE_TREE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use choice_tree::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Outcomes from {}", config.inference.endpoint);
//! ```

mod error;
mod inference;
mod interaction;
mod layout;
mod logging;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use inference::{retry_delay, InferenceConfig, MAX_RETRIES};
pub use interaction::InteractionConfig;
pub use layout::LayoutConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Outcome inference service (endpoint, timeout, retries)
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Spacing constants and zoom step
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Click disambiguation and submission debounce
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Flowchart persistence backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHOICE_TREE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHOICE_TREE__INFERENCE__ENDPOINT=https://...` -> `inference.endpoint`
    /// - `CHOICE_TREE__LAYOUT__SPACING__HORIZONTAL=600` -> `layout.spacing.horizontal`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHOICE_TREE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.inference.validate()?;
        self.layout.validate()?;
        self.interaction.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
