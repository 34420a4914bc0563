//! HTTP Outcome Service - Implementation of OutcomeService over JSON/HTTP.
//!
//! Sends `POST {endpoint}` with body `{"query": "..."}` and expects
//! `{"outcomes": [{"title", "description", "probability"}]}` back. Any
//! non-2xx status is a failure for that call.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpOutcomeConfig::new("https://outcomes.example.com")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_retries(1);
//!
//! let service = HttpOutcomeService::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{retry_delay, InferenceConfig};
use crate::ports::{InferenceError, OutcomeQuery, OutcomeRecord, OutcomeResponse, OutcomeService};

/// Configuration for the HTTP outcome service.
#[derive(Debug, Clone)]
pub struct HttpOutcomeConfig {
    /// Full URL of the outcomes endpoint.
    pub endpoint: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further attempt.
    pub retry_backoff: Duration,
}

impl HttpOutcomeConfig {
    /// Creates a new configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(60),
            max_retries: 0,
            retry_backoff: Duration::from_secs(1),
        }
    }

    /// Sets the bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial retry delay.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

impl From<&InferenceConfig> for HttpOutcomeConfig {
    fn from(config: &InferenceConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
        }
    }
}

/// Outcome service backed by an HTTP endpoint.
pub struct HttpOutcomeService {
    config: HttpOutcomeConfig,
    client: Client,
}

impl HttpOutcomeService {
    /// Creates a new service with the given configuration.
    pub fn new(config: HttpOutcomeConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Sends one request without retrying.
    async fn send_request(&self, query: &OutcomeQuery) -> Result<Response, InferenceError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(query);
        if let Some(key) = self.config.api_key() {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                InferenceError::network(format!("Connection failed: {}", e))
            } else {
                InferenceError::network(e.to_string())
            }
        })
    }

    /// Turns a non-success status into an error.
    async fn handle_response_status(response: Response) -> Result<Response, InferenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(InferenceError::status(status.as_u16(), body))
    }

    /// Parses a success response.
    async fn parse_response(response: Response) -> Result<Vec<OutcomeRecord>, InferenceError> {
        let response = Self::handle_response_status(response).await?;
        let body: OutcomeResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::parse(format!("Failed to parse response: {}", e)))?;
        Ok(body.outcomes)
    }

    async fn attempt(&self, query: &OutcomeQuery) -> Result<Vec<OutcomeRecord>, InferenceError> {
        let response = self.send_request(query).await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl OutcomeService for HttpOutcomeService {
    async fn fetch_outcomes(&self, query: &OutcomeQuery) -> Result<Vec<OutcomeRecord>, InferenceError> {
        let mut retry_count = 0;

        loop {
            match self.attempt(query).await {
                Ok(outcomes) => {
                    tracing::debug!(count = outcomes.len(), "Inference service returned outcomes");
                    return Ok(outcomes);
                }
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    let delay = retry_delay(self.config.retry_backoff, retry_count);
                    tracing::warn!(error = %err, attempt = retry_count + 1, ?delay, "Retrying outcome request");
                    sleep(delay).await;
                    retry_count += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = HttpOutcomeConfig::new("https://outcomes.example.com")
            .with_api_key("test-key")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(2)
            .with_retry_backoff(Duration::from_millis(10));

        assert_eq!(config.endpoint, "https://outcomes.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff, Duration::from_millis(10));
        assert_eq!(config.api_key(), Some("test-key"));
    }

    #[test]
    fn config_from_inference_section() {
        let section = InferenceConfig {
            endpoint: "https://outcomes.example.com/api".to_string(),
            timeout_secs: 5,
            max_retries: 2,
            ..Default::default()
        };

        let config = HttpOutcomeConfig::from(&section);

        assert_eq!(config.endpoint, "https://outcomes.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn config_defaults_to_no_retries_and_no_key() {
        let config = HttpOutcomeConfig::new("http://localhost");
        assert_eq!(config.max_retries, 0);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let config = HttpOutcomeConfig::new("http://localhost").with_api_key("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let config = HttpOutcomeConfig::new("http://127.0.0.1:9/outcomes")
            .with_timeout(Duration::from_secs(2));
        let service = HttpOutcomeService::new(config).unwrap();

        let result = service.fetch_outcomes(&OutcomeQuery::action("go")).await;

        assert!(matches!(
            result,
            Err(InferenceError::Network(_)) | Err(InferenceError::Timeout { .. })
        ));
    }
}
