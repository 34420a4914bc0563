//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `OutcomeService` - Remote inference of possible outcomes for an action
//! - `FlowchartRepository` - Wholesale save/load/list of decision trees

mod flowchart_repository;
mod outcome_service;

pub use flowchart_repository::{
    FlowchartRecord, FlowchartRepository, FlowchartSummary, RepositoryError,
};
pub use outcome_service::{
    InferenceError, OutcomeQuery, OutcomeRecord, OutcomeResponse, OutcomeService,
};
