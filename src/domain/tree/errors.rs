//! Errors raised when accepting a tree from outside the engine.

use thiserror::Error;

use super::NodeKind;
use crate::domain::foundation::NodeId;

/// A loaded tree breaks a structural invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("node id '{0}' appears more than once")]
    DuplicateId(NodeId),

    #[error("{kind:?} node '{id}' carries outcome-only fields")]
    OutcomeFieldOnNonOutcome { id: NodeId, kind: NodeKind },
}
