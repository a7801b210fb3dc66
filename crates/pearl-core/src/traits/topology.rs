use crate::errors::PearlResult;
use crate::NodeId;

/// Topology queries the inference engine needs from a graph substrate.
///
/// Implementations guarantee that every node has at most one parent.
pub trait ITreeTopology {
    /// Number of nodes; valid indices are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// The unique node without a parent.
    fn root(&self) -> PearlResult<NodeId>;

    /// Parent of `node`, or `None` for the root or an out-of-range index.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node` in ascending index order.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// In-degree of `node` (0 or 1).
    fn parent_count(&self, node: NodeId) -> usize;

    /// Number of states of `node`.
    fn cardinality(&self, node: NodeId) -> usize;
}
