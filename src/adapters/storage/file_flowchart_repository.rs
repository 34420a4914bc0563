//! File-based Flowchart Repository Adapter
//!
//! Stores each saved flowchart as one JSON file, `<base>/<id>.json`, holding
//! the owner, the creation time and the complete tree.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::domain::foundation::{FlowchartId, UserId};
use crate::domain::tree::{validate_tree, TreeNode};
use crate::ports::{FlowchartRecord, FlowchartRepository, FlowchartSummary, RepositoryError};

/// File-based storage for flowcharts
#[derive(Debug, Clone)]
pub struct FileFlowchartRepository {
    base_path: PathBuf,
}

impl FileFlowchartRepository {
    /// Create a new file repository with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileFlowchartRepository::new("./data/flowcharts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn record_path(&self, id: FlowchartId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    async fn ensure_dir(&self) -> Result<(), RepositoryError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))
    }

    async fn read_record(path: &Path) -> Result<FlowchartRecord, RepositoryError> {
        let json = fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;

        let record: FlowchartRecord = serde_json::from_str(&json)
            .map_err(|e| RepositoryError::DeserializationFailed(e.to_string()))?;

        validate_tree(&record.tree_data)
            .map_err(|e| RepositoryError::DeserializationFailed(e.to_string()))?;

        Ok(record)
    }
}

#[async_trait]
impl FlowchartRepository for FileFlowchartRepository {
    async fn save(&self, user_id: &UserId, tree: Arc<TreeNode>) -> Result<FlowchartId, RepositoryError> {
        self.ensure_dir().await?;

        let record = FlowchartRecord::new(user_id.clone(), tree);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| RepositoryError::SerializationFailed(e.to_string()))?;

        fs::write(self.record_path(record.id), json)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;

        tracing::debug!(flowchart_id = %record.id, user_id = %user_id, "Saved flowchart");
        Ok(record.id)
    }

    async fn load(&self, id: FlowchartId) -> Result<Arc<TreeNode>, RepositoryError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(RepositoryError::NotFound(id));
        }

        let record = Self::read_record(&path).await?;
        Ok(record.tree_data)
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<FlowchartSummary>, RepositoryError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(record) if &record.user_id == user_id => summaries.push(record.summary()),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable flowchart");
                }
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}
