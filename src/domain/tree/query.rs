//! Read-only traversal and lookup over a tree snapshot.
//!
//! Lookups return `None` when an id or path no longer resolves; callers treat
//! that as a stale reference and abort the interaction.

use std::collections::HashSet;

use super::{NodeKind, NodePath, TreeError, TreeNode};
use crate::domain::foundation::NodeId;

/// Depth-first search for the first node with the given id.
pub fn find_by_id<'a>(root: &'a TreeNode, id: &NodeId) -> Option<&'a TreeNode> {
    if root.id() == id {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find_by_id(child, id))
}

/// Depth-first search for the index path of the node with the given id.
pub fn path_of(root: &TreeNode, id: &NodeId) -> Option<NodePath> {
    let mut indices = Vec::new();
    if locate(root, id, &mut indices) {
        Some(NodePath::from(indices))
    } else {
        None
    }
}

fn locate(node: &TreeNode, id: &NodeId, indices: &mut Vec<usize>) -> bool {
    if node.id() == id {
        return true;
    }
    for (index, child) in node.children().iter().enumerate() {
        indices.push(index);
        if locate(child, id, indices) {
            return true;
        }
        indices.pop();
    }
    false
}

/// Follows a path from the root; `None` if any index is out of range.
pub fn node_at_path<'a>(root: &'a TreeNode, path: &NodePath) -> Option<&'a TreeNode> {
    path.as_slice()
        .iter()
        .try_fold(root, |node, &index| node.children().get(index).map(|c| &**c))
}

/// Pre-order walk yielding every node with its path.
pub fn walk(root: &TreeNode) -> Walk<'_> {
    Walk {
        stack: vec![(NodePath::root(), root)],
    }
}

/// Iterator returned by [`walk`].
pub struct Walk<'a> {
    stack: Vec<(NodePath, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodePath, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (index, child) in node.children().iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}

/// Number of outcome nodes anywhere in the tree.
pub fn count_outcomes(root: &TreeNode) -> usize {
    walk(root)
        .filter(|(_, node)| node.is(NodeKind::Outcome))
        .count()
}

/// Checks a tree received from outside the engine (e.g. a saved flowchart).
///
/// Rejects duplicate ids and outcome-only fields on situation or action
/// nodes.
pub fn validate_tree(root: &TreeNode) -> Result<(), TreeError> {
    let mut seen = HashSet::new();
    for (_, node) in walk(root) {
        if !seen.insert(node.id()) {
            return Err(TreeError::DuplicateId(node.id().clone()));
        }
        if !node.is(NodeKind::Outcome) && node.has_outcome_fields() {
            return Err(TreeError::OutcomeFieldOnNonOutcome {
                id: node.id().clone(),
                kind: node.kind(),
            });
        }
    }
    Ok(())
}
