//! Mock Outcome Service for testing.
//!
//! Provides a configurable mock implementation of the OutcomeService port,
//! allowing tests to run without calling the real inference service.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Per-response simulated delays for cancellation and ordering tests
//! - Error injection
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{InferenceError, OutcomeQuery, OutcomeRecord, OutcomeService};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return these outcomes.
    Outcomes(Vec<OutcomeRecord>),
    /// Return an error.
    Error(InferenceError),
}

#[derive(Debug, Clone)]
struct Scripted {
    response: MockResponse,
    delay: Duration,
}

/// Mock outcome service for testing.
#[derive(Debug, Clone, Default)]
pub struct MockOutcomeService {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<OutcomeQuery>>>,
}

impl MockOutcomeService {
    /// Creates a new mock service with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response built from `(title, probability)` pairs.
    pub fn with_outcomes(self, outcomes: &[(&str, f64)]) -> Self {
        self.with_outcomes_after(outcomes, Duration::ZERO)
    }

    /// Queues a successful response that resolves after `delay`.
    pub fn with_outcomes_after(self, outcomes: &[(&str, f64)], delay: Duration) -> Self {
        let records = outcomes
            .iter()
            .map(|(title, probability)| {
                OutcomeRecord::new(*title, format!("What happens: {}", title), *probability)
            })
            .collect();
        self.push(MockResponse::Outcomes(records), delay)
    }

    /// Queues an error response.
    pub fn with_error(self, error: InferenceError) -> Self {
        self.push(MockResponse::Error(error), Duration::ZERO)
    }

    fn push(self, response: MockResponse, delay: Duration) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted { response, delay });
        self
    }

    /// Returns the number of calls made to this service.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded queries.
    pub fn get_calls(&self) -> Vec<OutcomeQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> Scripted {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted {
                response: MockResponse::Outcomes(Vec::new()),
                delay: Duration::ZERO,
            })
    }
}

#[async_trait]
impl OutcomeService for MockOutcomeService {
    async fn fetch_outcomes(&self, query: &OutcomeQuery) -> Result<Vec<OutcomeRecord>, InferenceError> {
        self.calls.lock().unwrap().push(query.clone());
        let scripted = self.next_response();

        if !scripted.delay.is_zero() {
            sleep(scripted.delay).await;
        }

        match scripted.response {
            MockResponse::Outcomes(records) => Ok(records),
            MockResponse::Error(err) => Err(err),
        }
    }
}
