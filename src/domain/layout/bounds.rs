//! Bounding box and canvas size over a whole tree.

use serde::Serialize;

use super::LayoutSpacing;
use crate::domain::tree::TreeNode;

/// Extremes of node positions across every node of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Size of the scrollable canvas that holds every node with one spacing
    /// step of margin.
    pub fn canvas_size(&self, spacing: &LayoutSpacing) -> Size {
        Size {
            width: self.width() + spacing.node_width + spacing.horizontal,
            height: self.height() + spacing.node_height + spacing.vertical,
        }
    }
}

/// Width and height in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Walks every node once, including branches off the active path.
pub fn bounding_box(root: &TreeNode) -> BoundingBox {
    let origin = root.position();
    let mut bounds = BoundingBox {
        min_x: origin.x,
        min_y: origin.y,
        max_x: origin.x,
        max_y: origin.y,
    };
    let mut stack: Vec<&TreeNode> = root.children().iter().map(|c| &**c).collect();
    while let Some(node) = stack.pop() {
        let p = node.position();
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x);
        bounds.max_y = bounds.max_y.max(p.y);
        stack.extend(node.children().iter().map(|c| &**c));
    }
    bounds
}
