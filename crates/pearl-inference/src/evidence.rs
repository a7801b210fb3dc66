//! The set of nodes instantiated during the current session.

use pearl_core::NodeId;

/// Insertion-ordered evidence nodes with their observed states.
///
/// Grows during a session and is only emptied by [`EvidenceSet::clear`] at
/// session start.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    order: Vec<NodeId>,
    states: Vec<Option<usize>>,
}

impl EvidenceSet {
    pub fn new(node_count: usize) -> Self {
        Self {
            order: Vec::new(),
            states: vec![None; node_count],
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.state_of(node).is_some()
    }

    /// Observed state of `node`, if it is evidence.
    pub fn state_of(&self, node: NodeId) -> Option<usize> {
        self.states.get(node).copied().flatten()
    }

    /// Record `node` as observed in `state`. No-op (returns `false`) if the
    /// node is already present, whatever its state.
    pub fn register(&mut self, node: NodeId, state: usize) -> bool {
        if self.contains(node) {
            return false;
        }
        if node >= self.states.len() {
            self.states.resize(node + 1, None);
        }
        self.states[node] = Some(state);
        self.order.push(node);
        true
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Evidence nodes in observation order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// `(node, state)` pairs in observation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.order
            .iter()
            .filter_map(|&node| self.state_of(node).map(|state| (node, state)))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.states.iter_mut().for_each(|s| *s = None);
    }
}
