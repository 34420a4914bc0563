//! Copy-then-patch mutations.
//!
//! Every edit takes the current root and returns a new root carrying exactly
//! one localized change. Nodes on the path from the root to the change are
//! cloned; all other subtrees are shared with the previous snapshot, which
//! stays valid and unchanged. A stale path yields `None` and no new tree.

use std::sync::Arc;

use super::{NodeKind, NodePath, Position, TreeNode};

/// Applies `patch` to a copy of the node at `path` and rebuilds the spine.
pub fn update_at<F>(root: &Arc<TreeNode>, path: &NodePath, patch: F) -> Option<Arc<TreeNode>>
where
    F: FnOnce(&mut TreeNode),
{
    patch_spine(root, path.as_slice(), patch)
}

fn patch_spine<F>(node: &Arc<TreeNode>, rest: &[usize], patch: F) -> Option<Arc<TreeNode>>
where
    F: FnOnce(&mut TreeNode),
{
    match rest.split_first() {
        None => {
            let mut copy = TreeNode::clone(node);
            patch(&mut copy);
            Some(Arc::new(copy))
        }
        Some((&index, tail)) => {
            let child = node.children().get(index)?;
            let patched = patch_spine(child, tail, patch)?;
            let mut copy = TreeNode::clone(node);
            copy.children_mut()[index] = patched;
            Some(Arc::new(copy))
        }
    }
}

/// Replaces the text content of one node.
pub fn replace_content(
    root: &Arc<TreeNode>,
    path: &NodePath,
    content: impl Into<String>,
) -> Option<Arc<TreeNode>> {
    let content = content.into();
    update_at(root, path, move |node| node.set_content(content))
}

/// Replaces the children of one node.
pub fn replace_children(
    root: &Arc<TreeNode>,
    path: &NodePath,
    children: Vec<TreeNode>,
) -> Option<Arc<TreeNode>> {
    update_at(root, path, move |node| {
        *node.children_mut() = children.into_iter().map(Arc::new).collect();
    })
}

/// Overwrites the position of one node. Descendants keep their coordinates.
pub fn replace_position(
    root: &Arc<TreeNode>,
    path: &NodePath,
    position: Position,
) -> Option<Arc<TreeNode>> {
    update_at(root, path, move |node| node.set_position(position))
}

/// Records a submitted action: its final text and its freshly generated
/// outcomes, replacing whatever children it had.
pub fn complete_action(
    root: &Arc<TreeNode>,
    path: &NodePath,
    content: impl Into<String>,
    outcomes: Vec<TreeNode>,
) -> Option<Arc<TreeNode>> {
    let content = content.into();
    update_at(root, path, move |node| {
        node.set_content(content);
        *node.children_mut() = outcomes.into_iter().map(Arc::new).collect();
    })
}

/// Attaches `action` as the only child of the outcome at `outcome_path`.
///
/// Action children of the outcome's siblings are pruned in the same edit so
/// that one decision level has a single active exploration branch. Returns
/// `None` if the path is stale or does not address an outcome.
pub fn attach_action(
    root: &Arc<TreeNode>,
    outcome_path: &NodePath,
    action: TreeNode,
) -> Option<Arc<TreeNode>> {
    let target = super::node_at_path(root, outcome_path)?;
    if !target.is(NodeKind::Outcome) {
        return None;
    }

    let Some((parent_path, index)) = outcome_path.split_last() else {
        return replace_children(root, outcome_path, vec![action]);
    };

    let action = Arc::new(action);
    update_at(root, &parent_path, move |parent| {
        for (i, sibling) in parent.children_mut().iter_mut().enumerate() {
            if i == index {
                let mut copy = TreeNode::clone(sibling);
                *copy.children_mut() = vec![action.clone()];
                *sibling = Arc::new(copy);
            } else if sibling.is(NodeKind::Outcome)
                && sibling.children().iter().any(|c| c.is(NodeKind::Action))
            {
                let mut copy = TreeNode::clone(sibling);
                copy.children_mut().retain(|c| !c.is(NodeKind::Action));
                *sibling = Arc::new(copy);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::fixtures::{id, outcome, sample_tree};
    use crate::domain::tree::{find_by_id, node_at_path};

    fn shared() -> Arc<TreeNode> {
        Arc::new(sample_tree())
    }

    #[test]
    fn replace_content_leaves_old_snapshot_untouched() {
        let old = shared();
        let path = NodePath::from(vec![1, 0]);

        let new = replace_content(&old, &path, "go up").unwrap();

        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(node_at_path(&old, &path).unwrap().content(), "go right");
        assert_eq!(node_at_path(&new, &path).unwrap().content(), "go up");
        assert_eq!(*old, sample_tree());
    }

    #[test]
    fn untouched_subtrees_are_shared() {
        let old = shared();
        let new = replace_content(&old, &NodePath::from(vec![1, 0]), "x").unwrap();

        assert!(Arc::ptr_eq(&old.children()[0], &new.children()[0]));
        assert!(!Arc::ptr_eq(&old.children()[1], &new.children()[1]));
    }

    #[test]
    fn stale_path_produces_no_tree() {
        let old = shared();
        assert!(replace_content(&old, &NodePath::from(vec![9]), "x").is_none());
        assert!(replace_position(&old, &NodePath::from(vec![0, 0]), Position::ORIGIN).is_none());
    }

    #[test]
    fn replace_position_moves_only_that_node() {
        let old = shared();
        let path = NodePath::from(vec![1, 0]);

        let new = replace_position(&old, &path, Position::new(10.0, 20.0)).unwrap();

        assert_eq!(node_at_path(&new, &path).unwrap().position(), Position::new(10.0, 20.0));
        let child = node_at_path(&new, &path.child(0)).unwrap();
        assert_eq!(child.position(), Position::new(1400.0, 0.0));
    }

    #[test]
    fn complete_action_sets_content_and_children() {
        let old = shared();
        let path = NodePath::from(vec![1, 0]);
        let outcomes = vec![outcome("new-0", 1, Position::ORIGIN)];

        let new = complete_action(&old, &path, "go down", outcomes).unwrap();
        let node = node_at_path(&new, &path).unwrap();

        assert_eq!(node.content(), "go down");
        assert_eq!(node.children().len(), 1);
        assert!(find_by_id(&new, &id("o-1-0")).is_none());
        assert!(find_by_id(&old, &id("o-1-0")).is_some());
    }

    #[test]
    fn attach_action_prunes_sibling_action_children() {
        let old = shared();
        let action = TreeNode::action(id("fresh"), "", Position::new(850.0, -75.0));

        let new = attach_action(&old, &NodePath::from(vec![0]), action).unwrap();

        assert_eq!(new.children()[0].children().len(), 1);
        assert_eq!(new.children()[0].children()[0].id(), &id("fresh"));
        assert!(new.children()[1].children().is_empty());
        assert!(find_by_id(&new, &id("a-1")).is_none());
        assert!(find_by_id(&old, &id("a-1")).is_some());
    }

    #[test]
    fn attach_action_replaces_existing_action_on_target() {
        let old = shared();
        let action = TreeNode::action(id("again"), "", Position::ORIGIN);

        let new = attach_action(&old, &NodePath::from(vec![1]), action).unwrap();

        let target = &new.children()[1];
        assert_eq!(target.children().len(), 1);
        assert_eq!(target.children()[0].id(), &id("again"));
    }

    #[test]
    fn attach_action_does_not_touch_other_levels() {
        let old = shared();
        let action = TreeNode::action(id("deep"), "", Position::ORIGIN);

        let new = attach_action(&old, &NodePath::from(vec![1, 0, 1]), action).unwrap();

        assert!(find_by_id(&new, &id("a-1")).is_some());
        assert!(find_by_id(&new, &id("deep")).is_some());
        assert!(node_at_path(&new, &NodePath::from(vec![1, 0, 0]))
            .unwrap()
            .children()
            .is_empty());
    }

    #[test]
    fn attach_action_requires_outcome_target() {
        let old = shared();
        let action = TreeNode::action(id("x"), "", Position::ORIGIN);

        assert!(attach_action(&old, &NodePath::root(), action.clone()).is_none());
        assert!(attach_action(&old, &NodePath::from(vec![1, 0]), action).is_none());
    }
}
