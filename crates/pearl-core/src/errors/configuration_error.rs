use crate::NodeId;

/// Structural and setup errors: the network is not in a state inference can run on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("a network needs at least one node")]
    EmptyNetwork,

    #[error("node {node} out of range (network has {node_count} nodes)")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("self loop on node {node}")]
    SelfLoop { node: NodeId },

    #[error("edge {parent} -> {child} already exists")]
    DuplicateEdge { parent: NodeId, child: NodeId },

    #[error("node {child} already has parent {existing_parent}, cannot add parent {requested_parent}")]
    MultipleParents {
        child: NodeId,
        existing_parent: NodeId,
        requested_parent: NodeId,
    },

    #[error("cycle detected: {path}")]
    CycleDetected { path: String },

    #[error("edge {parent} -> {child} does not exist")]
    EdgeNotFound { parent: NodeId, child: NodeId },

    #[error("invalid cardinality {cardinality} for node {node}")]
    InvalidCardinality { node: NodeId, cardinality: usize },

    #[error("node {node} expects {expected} probabilities, got {actual}")]
    ProbabilityCountMismatch {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("node {node}: probability {value} at index {index} is not in [0, 1]")]
    InvalidProbability {
        node: NodeId,
        index: usize,
        value: f64,
    },

    #[error("node {node}: CPT row {row} sums to {sum}, expected 1")]
    UnnormalizedRow { node: NodeId, row: usize, sum: f64 },

    #[error("node {node} has no probability table")]
    MissingProbabilities { node: NodeId },

    #[error("network has no root (every node has a parent)")]
    MissingRoot,

    #[error("network has multiple roots: {roots:?}")]
    MultipleRoots { roots: Vec<NodeId> },

    #[error("state {state} out of range for node {node} with cardinality {cardinality}")]
    StateOutOfRange {
        node: NodeId,
        state: usize,
        cardinality: usize,
    },

    #[error("no inference session is active")]
    SessionNotStarted,
}
