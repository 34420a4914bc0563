//! Tree node entity and its value types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::NodeId;

/// Kind of a node in the decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Initial context described by the user.
    Situation,
    /// A move the user intends to make.
    Action,
    /// A possible result of an action, carrying a probability.
    Outcome,
}

/// 2-D canvas coordinates of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The canvas origin.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    /// Creates a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by the given deltas.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Payload of an outcome node as produced by the inference service.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeFields {
    pub title: String,
    pub description: String,
    pub probability: f64,
    pub option_number: u32,
}

/// Read-only detail view opened by the `+` affordance on an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeDetail {
    pub probability: f64,
    pub title: String,
    pub option_number: u32,
    pub content: String,
}

/// A node in the decision tree.
///
/// Nodes are immutable once shared: children are held behind `Arc` so that
/// edits copy only the nodes on the path to the change and every earlier
/// snapshot of the tree stays valid. Only `Outcome` nodes carry
/// `probability`, `title` and `option_number`; the constructors enforce this
/// and [`validate_tree`](super::validate_tree) checks it for loaded trees.
///
/// The serialized form keeps the field names of saved flowcharts: the kind
/// is stored as `type` and the children as `outcomes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    id: NodeId,
    content: String,
    position: Position,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(rename = "outcomes", default)]
    children: Vec<Arc<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    option_number: Option<u32>,
}

impl TreeNode {
    fn bare(id: NodeId, kind: NodeKind, content: String, position: Position) -> Self {
        Self {
            id,
            content,
            position,
            kind,
            children: Vec::new(),
            probability: None,
            title: None,
            option_number: None,
        }
    }

    /// Creates a situation node.
    pub fn situation(id: NodeId, content: impl Into<String>, position: Position) -> Self {
        Self::bare(id, NodeKind::Situation, content.into(), position)
    }

    /// Creates an action node.
    pub fn action(id: NodeId, content: impl Into<String>, position: Position) -> Self {
        Self::bare(id, NodeKind::Action, content.into(), position)
    }

    /// Creates an outcome node. The description becomes the node content.
    pub fn outcome(id: NodeId, fields: OutcomeFields, position: Position) -> Self {
        let mut node = Self::bare(id, NodeKind::Outcome, fields.description, position);
        node.probability = Some(fields.probability);
        node.title = Some(fields.title);
        node.option_number = Some(fields.option_number);
        node
    }

    /// Replaces the children, consuming and returning the node.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[Arc<TreeNode>] {
        &self.children
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn option_number(&self) -> Option<u32> {
        self.option_number
    }

    /// Returns true if this node has the given kind.
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Returns true if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Projects an outcome node into its detail view.
    ///
    /// Returns `None` for situation and action nodes. Missing values default
    /// to zero or an empty title.
    pub fn outcome_detail(&self) -> Option<OutcomeDetail> {
        if self.kind != NodeKind::Outcome {
            return None;
        }
        Some(OutcomeDetail {
            probability: self.probability.unwrap_or(0.0),
            title: self.title.clone().unwrap_or_default(),
            option_number: self.option_number.unwrap_or(0),
            content: self.content.clone(),
        })
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Arc<TreeNode>> {
        &mut self.children
    }

    pub(crate) fn has_outcome_fields(&self) -> bool {
        self.probability.is_some() || self.title.is_some() || self.option_number.is_some()
    }
}
