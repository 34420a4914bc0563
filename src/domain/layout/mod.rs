//! Layout engine - node coordinates, canvas bounds and zoom.
//!
//! Positions are assigned once, when a rank is inserted; nodes already on
//! screen keep their coordinates when the tree grows.

mod bounds;
mod scene;
mod spacing;
mod view;

pub use bounds::{bounding_box, BoundingBox, Size};
pub use scene::{scene, Scene, SceneEdge, SceneNode};
pub use spacing::{rank_positions, LayoutSpacing};
pub use view::ViewTransform;
