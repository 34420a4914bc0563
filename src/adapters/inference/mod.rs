//! Inference Adapters.
//!
//! Implementations of the OutcomeService port.
//!
//! ## Available Adapters
//!
//! - `HttpOutcomeService` - JSON over HTTP to the hosted outcome endpoint
//! - `MockOutcomeService` - Scripted responses for tests

mod http_outcome_service;
mod mock_outcome_service;

pub use http_outcome_service::{HttpOutcomeConfig, HttpOutcomeService};
pub use mock_outcome_service::{MockOutcomeService, MockResponse};
