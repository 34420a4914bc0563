//! Flat, render-ready projection of a tree and the current selection.

use serde::Serialize;

use super::{bounding_box, BoundingBox, LayoutSpacing, Size};
use crate::domain::foundation::NodeId;
use crate::domain::tree::{walk, NodeKind, NodePath, Position, TreeNode};

/// One node as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Position,
    pub path: NodePath,
    /// The node is the selection itself.
    pub selected: bool,
    /// The node is the selection or one of its ancestors.
    pub on_selected_path: bool,
}

/// A parent→child connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// The child end lies on the selected path.
    pub highlighted: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
    pub bounds: BoundingBox,
    pub canvas: Size,
}

/// Builds the scene in pre-order, so parents precede their children.
pub fn scene(root: &TreeNode, selection: &NodePath, spacing: &LayoutSpacing) -> Scene {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for (path, node) in walk(root) {
        let on_selected_path = path.is_prefix_of(selection);
        for (index, child) in node.children().iter().enumerate() {
            edges.push(SceneEdge {
                from: node.id().clone(),
                to: child.id().clone(),
                highlighted: path.child(index).is_prefix_of(selection),
            });
        }
        nodes.push(SceneNode {
            id: node.id().clone(),
            kind: node.kind(),
            position: node.position(),
            selected: &path == selection,
            on_selected_path,
            path,
        });
    }

    let bounds = bounding_box(root);
    Scene {
        nodes,
        edges,
        canvas: bounds.canvas_size(spacing),
        bounds,
    }
}
