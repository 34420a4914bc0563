//! Outcome Service Port - Interface for the remote outcome inference service.
//!
//! The service receives a free-text query (an action, or the situation and
//! the first action joined by a newline) and answers with a ranked list of
//! possible outcomes. The engine never looks inside the model; it only maps
//! records to tree nodes.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedService;
//!
//! #[async_trait]
//! impl OutcomeService for FixedService {
//!     async fn fetch_outcomes(&self, query: &OutcomeQuery) -> Result<Vec<OutcomeRecord>, InferenceError> {
//!         Ok(vec![OutcomeRecord::new("Works", "It works out", 80.0)])
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for outcome inference.
///
/// Implementations must be cancel-safe: callers race the returned future
/// against a cancellation token and drop it when a newer request supersedes
/// this one.
#[async_trait]
pub trait OutcomeService: Send + Sync {
    /// Requests the possible outcomes for a query.
    async fn fetch_outcomes(&self, query: &OutcomeQuery) -> Result<Vec<OutcomeRecord>, InferenceError>;
}

/// Request body sent to the inference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeQuery {
    pub query: String,
}

impl OutcomeQuery {
    /// Query for the first generation: situation and action on two lines.
    pub fn initial(situation: &str, action: &str) -> Self {
        Self {
            query: format!("{}\n{}", situation, action),
        }
    }

    /// Query for a follow-up action.
    pub fn action(text: impl Into<String>) -> Self {
        Self { query: text.into() }
    }

    /// Returns true when there is nothing to ask.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// One outcome as returned by the service.
///
/// Probabilities are taken as given; siblings are not required to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub title: String,
    pub description: String,
    pub probability: f64,
}

impl OutcomeRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>, probability: f64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            probability,
        }
    }
}

/// Response body returned by the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeResponse {
    pub outcomes: Vec<OutcomeRecord>,
}

/// Inference service errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl InferenceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            InferenceError::Network(_) | InferenceError::Timeout { .. } => true,
            InferenceError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            InferenceError::Parse(_) | InferenceError::InvalidRequest(_) => false,
        }
    }
}
