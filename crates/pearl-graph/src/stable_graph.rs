//! petgraph::StableGraph wrapper with TreeNode and TreeEdge types.

use std::fmt;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use pearl_core::constants::{DEFAULT_CARDINALITY, MAX_CARDINALITY, MIN_CARDINALITY};
use pearl_core::errors::{ConfigurationError, PearlResult};
use pearl_core::traits::ITreeTopology;
use pearl_core::NodeId;

use crate::tree_enforcement;

/// A node in the tree: one discrete random variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Stable index of the variable.
    pub id: NodeId,
    /// Number of states.
    pub cardinality: usize,
    /// Optional human-readable name, only used for display.
    pub label: Option<String>,
}

/// Weight on a parent → child link. Links carry no data of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEdge;

/// The underlying directed graph type.
pub type TreeStableGraph = StableGraph<TreeNode, TreeEdge, Directed>;

/// Directed graph over `0..node_count` that only ever holds a forest,
/// and a tree once exactly one root remains.
#[derive(Debug, Clone)]
pub struct TreeGraph {
    graph: TreeStableGraph,
    /// `node_index[id]` is the petgraph index of node `id`.
    node_index: Vec<NodeIndex>,
}

impl TreeGraph {
    /// Create `node_count` isolated binary nodes.
    pub fn new(node_count: usize) -> Self {
        Self::with_cardinality(node_count, DEFAULT_CARDINALITY)
    }

    /// Create `node_count` isolated nodes with `cardinality` states each.
    pub fn with_cardinality(node_count: usize, cardinality: usize) -> Self {
        let mut graph = TreeStableGraph::with_capacity(node_count, node_count.saturating_sub(1));
        let node_index = (0..node_count)
            .map(|id| {
                graph.add_node(TreeNode {
                    id,
                    cardinality,
                    label: None,
                })
            })
            .collect();
        Self { graph, node_index }
    }

    /// Read-only access to the petgraph structure.
    pub fn inner(&self) -> &TreeStableGraph {
        &self.graph
    }

    /// Resolve a node id, failing when it is out of range.
    pub fn index(&self, node: NodeId) -> PearlResult<NodeIndex> {
        self.node_index.get(node).copied().ok_or_else(|| {
            ConfigurationError::NodeOutOfRange {
                node,
                node_count: self.node_index.len(),
            }
            .into()
        })
    }

    /// Link `parent` → `child`.
    ///
    /// Rejects self loops, duplicate edges, a second parent for `child`, and
    /// any edge that would close a cycle.
    pub fn insert_edge(&mut self, parent: NodeId, child: NodeId) -> PearlResult<()> {
        let p = self.index(parent)?;
        let c = self.index(child)?;

        if p == c {
            return Err(ConfigurationError::SelfLoop { node: parent }.into());
        }
        if self.graph.find_edge(p, c).is_some() {
            return Err(ConfigurationError::DuplicateEdge { parent, child }.into());
        }
        if let Some(existing_parent) = self.parent_of(child) {
            return Err(ConfigurationError::MultipleParents {
                child,
                existing_parent,
                requested_parent: parent,
            }
            .into());
        }
        if let Some(path) = tree_enforcement::cycle_path(self, parent, child) {
            return Err(ConfigurationError::CycleDetected { path }.into());
        }

        self.graph.add_edge(p, c, TreeEdge);
        tracing::trace!(parent, child, "edge inserted");
        Ok(())
    }

    /// Unlink `parent` → `child`.
    pub fn remove_edge(&mut self, parent: NodeId, child: NodeId) -> PearlResult<()> {
        let p = self.index(parent)?;
        let c = self.index(child)?;
        let edge = self
            .graph
            .find_edge(p, c)
            .ok_or(ConfigurationError::EdgeNotFound { parent, child })?;
        self.graph.remove_edge(edge);
        tracing::trace!(parent, child, "edge removed");
        Ok(())
    }

    /// Whether `parent` → `child` is present.
    pub fn contains_edge(&self, parent: NodeId, child: NodeId) -> bool {
        match (self.node_index.get(parent), self.node_index.get(child)) {
            (Some(&p), Some(&c)) => self.graph.find_edge(p, c).is_some(),
            _ => false,
        }
    }

    /// All parentless nodes in ascending order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.node_index
            .iter()
            .filter(|&&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|&idx| self.graph[idx].id)
            .collect()
    }

    /// Every edge as `(parent, child)`, sorted.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(p, c)| (self.graph[p].id, self.graph[c].id))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Change the number of states of `node`.
    pub fn set_cardinality(&mut self, node: NodeId, cardinality: usize) -> PearlResult<()> {
        if !(MIN_CARDINALITY..=MAX_CARDINALITY).contains(&cardinality) {
            return Err(ConfigurationError::InvalidCardinality { node, cardinality }.into());
        }
        let idx = self.index(node)?;
        self.graph[idx].cardinality = cardinality;
        Ok(())
    }

    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) -> PearlResult<()> {
        let idx = self.index(node)?;
        self.graph[idx].label = Some(label.into());
        Ok(())
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        let idx = *self.node_index.get(node)?;
        self.graph[idx].label.as_deref()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl ITreeTopology for TreeGraph {
    fn node_count(&self) -> usize {
        self.node_index.len()
    }

    fn root(&self) -> PearlResult<NodeId> {
        let roots = self.roots();
        match roots.as_slice() {
            [] => Err(ConfigurationError::MissingRoot.into()),
            [root] => Ok(*root),
            _ => Err(ConfigurationError::MultipleRoots { roots }.into()),
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        let idx = *self.node_index.get(node)?;
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .map(|p| self.graph[p].id)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.node_index.get(node) else {
            return Vec::new();
        };
        let mut children: Vec<NodeId> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|c| self.graph[c].id)
            .collect();
        children.sort_unstable();
        children
    }

    fn parent_count(&self, node: NodeId) -> usize {
        self.node_index.get(node).map_or(0, |&idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .count()
        })
    }

    fn cardinality(&self, node: NodeId) -> usize {
        self.node_index
            .get(node)
            .map_or(0, |&idx| self.graph[idx].cardinality)
    }
}

/// Adjacency listing, one line per node: `3 -> 4 5`.
impl fmt::Display for TreeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in 0..self.node_count() {
            write!(f, "{node}")?;
            if let Some(label) = self.label(node) {
                write!(f, " ({label})")?;
            }
            write!(f, " ->")?;
            for child in self.children_of(node) {
                write!(f, " {child}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
