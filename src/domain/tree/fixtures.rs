//! Test trees shared by the tree and layout unit tests.

use proptest::prelude::*;

use super::{OutcomeFields, Position, TreeNode};
use crate::domain::foundation::NodeId;

pub fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

pub fn outcome(node_id: &str, option_number: u32, position: Position) -> TreeNode {
    TreeNode::outcome(
        id(node_id),
        OutcomeFields {
            title: format!("Outcome {}", option_number),
            description: format!("Description of {}", node_id),
            probability: 50.0,
            option_number,
        },
        position,
    )
}

/// ```text
/// root (action)
/// ├── o-0 (outcome)
/// └── o-1 (outcome)
///     └── a-1 (action)
///         ├── o-1-0 (outcome)
///         └── o-1-1 (outcome)
/// ```
pub fn sample_tree() -> TreeNode {
    let a1 = TreeNode::action(id("a-1"), "go right", Position::new(850.0, 75.0)).with_children(vec![
        outcome("o-1-0", 1, Position::new(1400.0, 0.0)),
        outcome("o-1-1", 2, Position::new(1400.0, 150.0)),
    ]);
    TreeNode::action(id("root"), "go left", Position::ORIGIN).with_children(vec![
        outcome("o-0", 1, Position::new(300.0, -75.0)),
        outcome("o-1", 2, Position::new(300.0, 75.0)).with_children(vec![a1]),
    ])
}

/// Random tree shapes with unique ids `n0..nk`; `n0` is the root.
pub fn arbitrary_tree() -> impl Strategy<Value = TreeNode> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..40).prop_map(|parents| {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); parents.len() + 1];
        for (offset, parent) in parents.iter().enumerate() {
            let node = offset + 1;
            children[parent.index(node)].push(node);
        }
        build(0, &children)
    })
}

fn build(node: usize, children: &[Vec<usize>]) -> TreeNode {
    let kids = children[node].iter().map(|&c| build(c, children)).collect();
    let name = format!("n{}", node);
    if node == 0 {
        TreeNode::action(id(&name), "root", Position::ORIGIN).with_children(kids)
    } else {
        outcome(&name, node as u32, Position::new(node as f64, 0.0)).with_children(kids)
    }
}
