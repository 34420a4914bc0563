//! Flowchart Repository Port - Interface for saving and loading whole trees.
//!
//! Persistence is wholesale: a save stores the complete tree, a load returns
//! the complete tree. There is no partial or incremental update.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::{FlowchartId, Timestamp, UserId};
use crate::domain::tree::TreeNode;

/// Errors that can occur during flowchart persistence
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Flowchart not found: {0}")]
    NotFound(FlowchartId),

    #[error("Failed to serialize flowchart: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize flowchart: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Listing entry for a saved flowchart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartSummary {
    pub id: FlowchartId,
    pub created_at: Timestamp,
}

/// A saved flowchart as stored by adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartRecord {
    pub id: FlowchartId,
    pub user_id: UserId,
    pub created_at: Timestamp,
    pub tree_data: Arc<TreeNode>,
}

impl FlowchartRecord {
    /// Creates a record stamped with a fresh id and the current time.
    pub fn new(user_id: UserId, tree_data: Arc<TreeNode>) -> Self {
        Self {
            id: FlowchartId::new(),
            user_id,
            created_at: Timestamp::now(),
            tree_data,
        }
    }

    pub fn summary(&self) -> FlowchartSummary {
        FlowchartSummary {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

/// Port for persisting decision trees per user
#[async_trait]
pub trait FlowchartRepository: Send + Sync {
    /// Save a complete tree for a user
    ///
    /// # Returns
    /// The id of the new flowchart
    ///
    /// # Errors
    /// Returns `RepositoryError` if the tree cannot be stored
    async fn save(&self, user_id: &UserId, tree: Arc<TreeNode>) -> Result<FlowchartId, RepositoryError>;

    /// Load a complete tree
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if no flowchart has this id
    async fn load(&self, id: FlowchartId) -> Result<Arc<TreeNode>, RepositoryError>;

    /// List a user's flowcharts, newest first
    async fn list(&self, user_id: &UserId) -> Result<Vec<FlowchartSummary>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_error_not_found() {
        let err = RepositoryError::NotFound(FlowchartId::new());
        assert!(err.to_string().contains("Flowchart not found"));
    }

    #[test]
    fn repository_error_serialization() {
        let err = RepositoryError::SerializationFailed("NaN".to_string());
        assert!(err.to_string().contains("serialize"));
    }
}
