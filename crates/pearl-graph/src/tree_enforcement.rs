//! Tree enforcement. Every node has at most one parent, so reachability
//! questions reduce to walking parent links; nothing here recurses.

use pearl_core::errors::PearlResult;
use pearl_core::traits::ITreeTopology;
use pearl_core::NodeId;

use super::stable_graph::TreeGraph;

/// Strict ancestors of `node`, nearest first.
///
/// Bounded by the node count, so a corrupted parent chain cannot loop forever.
pub fn ancestors(graph: &TreeGraph, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(graph.parent_of(node), move |&n| graph.parent_of(n))
        .take(graph.node_count())
}

/// The cycle `parent → child` would close, rendered root-side first
/// (`"0 -> 1 -> 2 -> 0"`), or `None` if the link is safe.
///
/// A cycle appears exactly when `child` is already an ancestor of `parent`.
pub fn cycle_path(graph: &TreeGraph, parent: NodeId, child: NodeId) -> Option<String> {
    // A leaf is nobody's ancestor; this keeps top-down construction linear.
    if parent != child && graph.children_of(child).is_empty() {
        return None;
    }
    let mut path = vec![parent];
    if parent != child {
        path.extend(ancestors(graph, parent).take_while(|&a| a != child));
        if path.last().and_then(|&last| graph.parent_of(last)) != Some(child) {
            return None;
        }
        path.push(child);
    }
    path.reverse();
    path.push(child);
    Some(
        path.iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" -> "),
    )
}

/// Confirm the graph is a single rooted tree and return its root.
///
/// Insertion keeps the graph a forest, so one root is all that is left to check.
pub fn validate_tree(graph: &TreeGraph) -> PearlResult<NodeId> {
    graph.root()
}
