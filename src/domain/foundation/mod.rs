//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and validation errors that form the
//! vocabulary of the decision tree domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{FlowchartId, NodeId, UserId};
pub use timestamp::Timestamp;
