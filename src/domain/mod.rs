//! Domain layer containing the decision tree and its layout.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `tree` - Tree model: nodes, paths, queries and copy-then-patch edits
//! - `layout` - Rank placement, bounding box, scene projection and zoom

pub mod foundation;
pub mod layout;
pub mod tree;
