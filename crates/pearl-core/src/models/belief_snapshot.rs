use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Posterior marginal of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBelief {
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub posterior: Vec<f64>,
    /// Observed state, if the node is evidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<usize>,
}

/// Posterior state of a whole network at one point of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefSnapshot {
    pub nodes: Vec<NodeBelief>,
    /// Evidence nodes in observation order.
    pub evidence: Vec<NodeId>,
}

impl BeliefSnapshot {
    pub fn belief(&self, node: NodeId) -> Option<&NodeBelief> {
        self.nodes.iter().find(|b| b.node == node)
    }

    /// Most probable state of `node`. Ties go to the lower state.
    pub fn most_probable(&self, node: NodeId) -> Option<usize> {
        let belief = self.belief(node)?;
        let mut best: Option<(usize, f64)> = None;
        for (state, &p) in belief.posterior.iter().enumerate() {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((state, p));
            }
        }
        best.map(|(state, _)| state)
    }
}
