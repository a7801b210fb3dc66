use crate::NodeId;

/// Failures raised while propagating evidence.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("inconsistent evidence at node {node}: belief mass sums to {sum}")]
    InconsistentEvidence { node: NodeId, sum: f64 },

    #[error("node {node} already observed in state {existing}, cannot observe state {requested}")]
    ConflictingEvidence {
        node: NodeId,
        existing: usize,
        requested: usize,
    },
}
