//! Tree model - the decision tree of situation, action and outcome nodes.
//!
//! # Module Organization
//!
//! - `node` - The `TreeNode` entity, its kind and position
//! - `path` - Index paths used for selection and path-addressed edits
//! - `query` - Lookups by id and path, traversal, validation
//! - `edit` - Copy-then-patch mutations returning a new root

mod edit;
mod errors;
mod node;
mod path;
mod query;

#[cfg(test)]
pub(crate) mod fixtures;

pub use edit::{
    attach_action, complete_action, replace_children, replace_content, replace_position,
    update_at,
};
pub use errors::TreeError;
pub use node::{NodeKind, OutcomeDetail, OutcomeFields, Position, TreeNode};
pub use path::NodePath;
pub use query::{count_outcomes, find_by_id, node_at_path, path_of, validate_tree, walk, Walk};
