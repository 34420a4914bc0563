//! Click vs double-click disambiguation.
//!
//! A click is a double click when it lands within the threshold of the
//! previous click. With per-node tracking the previous click must also have
//! hit the same node; global tracking compares against the last click on
//! any node.

use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::foundation::NodeId;

/// Default time window for a double click.
pub const DEFAULT_DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(300);

/// Scope of the previous-click record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTracking {
    /// Two clicks pair up only when they hit the same node.
    #[default]
    PerNode,
    /// Any two clicks within the threshold pair up.
    Global,
}

/// Classification of one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

#[derive(Debug, Clone)]
struct LastClick {
    node: NodeId,
    at: Instant,
}

/// Remembers the previous click and classifies the next one.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    threshold: Duration,
    tracking: ClickTracking,
    last: Option<LastClick>,
}

impl ClickTracker {
    pub fn new(threshold: Duration, tracking: ClickTracking) -> Self {
        Self {
            threshold,
            tracking,
            last: None,
        }
    }

    /// Records a click on `node` at `now` and classifies it.
    ///
    /// A double click consumes the pair, so a third quick click starts over
    /// as a single click.
    pub fn register(&mut self, node: &NodeId, now: Instant) -> ClickKind {
        let paired = self.last.as_ref().is_some_and(|last| {
            let same_target = match self.tracking {
                ClickTracking::PerNode => last.node == *node,
                ClickTracking::Global => true,
            };
            same_target && now.saturating_duration_since(last.at) < self.threshold
        });

        if paired {
            self.last = None;
            ClickKind::Double
        } else {
            self.last = Some(LastClick {
                node: node.clone(),
                at: now,
            });
            ClickKind::Single
        }
    }

    /// Forgets the previous click.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_THRESHOLD, ClickTracking::default())
    }
}
