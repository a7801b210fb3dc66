//! # pearl-graph
//!
//! Graph substrate for Pearl: a `petgraph::StableGraph` over integer node
//! indices, restricted to rooted trees. Every node has at most one parent and
//! edges that would close a cycle are rejected at insertion time.

pub mod stable_graph;
pub mod tree_enforcement;

pub use stable_graph::{TreeEdge, TreeGraph, TreeNode};
