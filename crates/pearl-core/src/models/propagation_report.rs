use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Which way a message travels along a tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    /// Diagnostic (lambda) message from a child to its parent.
    Upward,
    /// Causal (pi) message from a parent to one of its children.
    Downward,
}

/// A single tagged message in the propagation work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropagationMessage {
    pub direction: MessageDirection,
    pub source: NodeId,
    pub target: NodeId,
}

impl PropagationMessage {
    pub fn upward(child: NodeId, parent: NodeId) -> Self {
        Self {
            direction: MessageDirection::Upward,
            source: child,
            target: parent,
        }
    }

    pub fn downward(parent: NodeId, child: NodeId) -> Self {
        Self {
            direction: MessageDirection::Downward,
            source: parent,
            target: child,
        }
    }
}

/// What a session start or an observation did to the network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropagationReport {
    /// Messages in processing order.
    pub messages: Vec<PropagationMessage>,
    /// Nodes whose posterior was written, in write order.
    pub updated: Vec<NodeId>,
}

impl PropagationReport {
    /// True when nothing was touched (e.g. a repeated observation).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.updated.is_empty()
    }

    /// Number of times `node`'s posterior was written.
    pub fn update_count(&self, node: NodeId) -> usize {
        self.updated.iter().filter(|&&n| n == node).count()
    }

    pub fn count(&self, direction: MessageDirection) -> usize {
        self.messages
            .iter()
            .filter(|m| m.direction == direction)
            .count()
    }

    /// Append another report, keeping order.
    pub fn extend(&mut self, other: PropagationReport) {
        self.messages.extend(other.messages);
        self.updated.extend(other.updated);
    }
}
