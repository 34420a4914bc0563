//! Storage Adapters
//!
//! Implementations of the FlowchartRepository port for persisting trees.
//!
//! ## Available Adapters
//!
//! - **FileFlowchartRepository** - Stores each flowchart as a JSON file on disk
//! - **InMemoryFlowchartRepository** - Stores flowcharts in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileFlowchartRepository, InMemoryFlowchartRepository};
//!
//! // Production: file-based storage
//! let repo = FileFlowchartRepository::new("./data/flowcharts");
//!
//! // Testing: in-memory storage
//! let repo = InMemoryFlowchartRepository::new();
//! ```

mod file_flowchart_repository;
mod in_memory_flowchart_repository;

pub use file_flowchart_repository::FileFlowchartRepository;
pub use in_memory_flowchart_repository::InMemoryFlowchartRepository;
