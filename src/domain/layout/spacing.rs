//! Spacing constants and rank placement.

use serde::Deserialize;

use crate::domain::tree::Position;

/// Node size and the gaps between depth levels and siblings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    /// Rendered node width.
    pub node_width: f64,
    /// Rendered node height.
    pub node_height: f64,
    /// Horizontal gap between the root and the first generated rank.
    pub initial_horizontal: f64,
    /// Horizontal gap between deeper levels.
    pub horizontal: f64,
    /// Vertical gap between siblings of one rank.
    pub vertical: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 100.0,
            initial_horizontal: 300.0,
            horizontal: 550.0,
            vertical: 150.0,
        }
    }
}

impl LayoutSpacing {
    /// Horizontal offset for a new rank; the first rank off the root uses the
    /// initial spacing.
    pub fn horizontal_for(&self, first_rank: bool) -> f64 {
        if first_rank {
            self.initial_horizontal
        } else {
            self.horizontal
        }
    }

    /// Positions for `count` children of a node at `parent`.
    pub fn rank(&self, parent: Position, count: usize, first_rank: bool) -> Vec<Position> {
        rank_positions(parent, count, self.horizontal_for(first_rank), self.vertical)
    }

    /// Slot for the single action node opened under an outcome.
    pub fn action_slot(&self, outcome: Position) -> Position {
        outcome.offset(self.horizontal, 0.0)
    }

    /// Returns true when every constant is finite and positive.
    pub fn is_valid(&self) -> bool {
        [
            self.node_width,
            self.node_height,
            self.initial_horizontal,
            self.horizontal,
            self.vertical,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Stacks `count` children vertically, centred on the parent's `y`, one
/// horizontal step to the right.
pub fn rank_positions(parent: Position, count: usize, horizontal: f64, vertical: f64) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    let start_y = parent.y - (count - 1) as f64 * vertical / 2.0;
    let x = parent.x + horizontal;
    (0..count)
        .map(|i| Position::new(x, start_y + i as f64 * vertical))
        .collect()
}
