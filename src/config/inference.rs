//! Outcome inference service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// Delay before retry number `attempt` (zero-based): base, 2x base, 4x base, ...
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
}

/// Inference service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Outcomes endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Optional bearer token
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default)]
    pub max_retries: u32,

    /// First retry delay in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl InferenceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Deadline for one whole generation: every attempt plus the backoff
    /// between them.
    pub fn generation_timeout(&self) -> Duration {
        let backoff = (0..self.max_retries).fold(Duration::ZERO, |total, attempt| {
            total.saturating_add(retry_delay(self.retry_backoff(), attempt))
        });
        self.timeout()
            .saturating_mul(self.max_retries.saturating_add(1))
            .saturating_add(backoff)
    }

    /// Validate inference configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::MissingRequired("INFERENCE__ENDPOINT"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidEndpoint);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::InvalidRetryCount(self.max_retries));
        }
        Ok(())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000/outcomes".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retry_backoff() -> u64 {
    1000
}
