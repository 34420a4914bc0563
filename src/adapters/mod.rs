//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `inference` - Outcome service clients (HTTP, mock)
//! - `storage` - Flowchart repositories (file, in-memory)

pub mod inference;
pub mod storage;

pub use inference::{HttpOutcomeConfig, HttpOutcomeService, MockOutcomeService, MockResponse};
pub use storage::{FileFlowchartRepository, InMemoryFlowchartRepository};
