//! In-Memory Flowchart Repository Adapter
//!
//! Stores saved flowcharts in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{FlowchartId, UserId};
use crate::domain::tree::TreeNode;
use crate::ports::{FlowchartRecord, FlowchartRepository, FlowchartSummary, RepositoryError};

/// In-memory storage for flowcharts
#[derive(Debug, Clone)]
pub struct InMemoryFlowchartRepository {
    records: Arc<RwLock<HashMap<FlowchartId, FlowchartRecord>>>,
}

impl InMemoryFlowchartRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the number of stored flowcharts
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for InMemoryFlowchartRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlowchartRepository for InMemoryFlowchartRepository {
    async fn save(&self, user_id: &UserId, tree: Arc<TreeNode>) -> Result<FlowchartId, RepositoryError> {
        let record = FlowchartRecord::new(user_id.clone(), tree);
        let id = record.id;
        self.records.write().await.insert(id, record);
        Ok(id)
    }

    async fn load(&self, id: FlowchartId) -> Result<Arc<TreeNode>, RepositoryError> {
        let records = self.records.read().await;
        records
            .get(&id)
            .map(|r| r.tree_data.clone())
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<FlowchartSummary>, RepositoryError> {
        let records = self.records.read().await;
        let mut summaries: Vec<FlowchartSummary> = records
            .values()
            .filter(|r| &r.user_id == user_id)
            .map(FlowchartRecord::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
