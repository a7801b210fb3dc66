//! Canonical networks for tests and benchmarks, plus a brute-force
//! reference that computes exact posteriors by enumerating the joint.
//!
//! Builders panic on invalid input: a broken fixture is a test bug.

use pearl_core::config::PearlConfig;
use pearl_core::NodeId;
use pearl_inference::Network;

/// CPT used on every link of the canonical chains and stars.
pub const LINK_TABLE: [f64; 4] = [0.9, 0.1, 0.2, 0.8];

/// Structure, cardinalities and CPTs of a tree, kept separate from any
/// `Network` so the same description feeds both the engine and the
/// brute-force reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBlueprint {
    /// `parents[i]` is the parent of node `i`; exactly one entry is `None`.
    pub parents: Vec<Option<NodeId>>,
    pub cardinalities: Vec<usize>,
    /// CPT of each node in mixed-radix order (own state least significant).
    pub tables: Vec<Vec<f64>>,
    pub labels: Vec<Option<String>>,
}

impl TreeBlueprint {
    /// Binary tree where every node but the root uses `LINK_TABLE`.
    pub fn binary(parents: Vec<Option<NodeId>>, prior: [f64; 2]) -> Self {
        let tables = parents
            .iter()
            .map(|p| match p {
                None => prior.to_vec(),
                Some(_) => LINK_TABLE.to_vec(),
            })
            .collect();
        let n = parents.len();
        Self {
            parents,
            cardinalities: vec![2; n],
            tables,
            labels: vec![None; n],
        }
    }

    pub fn node_count(&self) -> usize {
        self.parents.len()
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| Some(l.to_string())).collect();
        self
    }

    /// Build the network without starting a session.
    ///
    /// # Panics
    /// Panics if the blueprint is rejected by the network.
    pub fn build(&self) -> Network {
        self.build_with_config(PearlConfig::default())
    }

    /// Same as [`build`](Self::build) with a custom configuration.
    pub fn build_with_config(&self, config: PearlConfig) -> Network {
        let n = self.node_count();
        let mut network = Network::with_config(n, config)
            .unwrap_or_else(|e| panic!("Failed to create network: {e}"));
        for (node, &card) in self.cardinalities.iter().enumerate() {
            network
                .set_cardinality(node, card)
                .unwrap_or_else(|e| panic!("Failed to set cardinality of {node}: {e}"));
        }
        for (child, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = *parent {
                network
                    .add_link(parent, child)
                    .unwrap_or_else(|e| panic!("Failed to link {parent} -> {child}: {e}"));
            }
        }
        for (node, table) in self.tables.iter().enumerate() {
            network
                .set_probabilities(node, table)
                .unwrap_or_else(|e| panic!("Failed to set CPT of {node}: {e}"));
        }
        for (node, label) in self.labels.iter().enumerate() {
            if let Some(label) = label {
                network
                    .set_label(node, label.as_str())
                    .unwrap_or_else(|e| panic!("Failed to label {node}: {e}"));
            }
        }
        network
    }

    /// Build the network and start its session.
    pub fn start(&self) -> Network {
        let mut network = self.build();
        network
            .start_session()
            .unwrap_or_else(|e| panic!("Failed to start session: {e}"));
        network
    }

    /// Exact posteriors given `evidence`, by summing the joint over every
    /// assignment. `None` when the evidence has probability zero.
    ///
    /// Exponential in the node count; keep blueprints small.
    pub fn brute_force(&self, evidence: &[(NodeId, usize)]) -> Option<Vec<Vec<f64>>> {
        let n = self.node_count();
        let total: usize = self.cardinalities.iter().product();
        let mut marginals: Vec<Vec<f64>> =
            self.cardinalities.iter().map(|&k| vec![0.0; k]).collect();
        let mut mass = 0.0;
        let mut states = vec![0usize; n];

        for assignment in 0..total {
            let mut rest = assignment;
            for (state, &card) in states.iter_mut().zip(&self.cardinalities) {
                *state = rest % card;
                rest /= card;
            }
            if evidence.iter().any(|&(node, s)| states[node] != s) {
                continue;
            }
            let joint: f64 = (0..n)
                .map(|i| {
                    let index = match self.parents[i] {
                        None => states[i],
                        Some(p) => states[p] * self.cardinalities[i] + states[i],
                    };
                    self.tables[i][index]
                })
                .product();
            mass += joint;
            for (marginal, &state) in marginals.iter_mut().zip(&states) {
                marginal[state] += joint;
            }
        }

        if mass <= 0.0 {
            return None;
        }
        for marginal in &mut marginals {
            marginal.iter_mut().for_each(|v| *v /= mass);
        }
        Some(marginals)
    }
}

/// Random-shaped binary tree: node `i + 1` hangs off
/// `parent_choices[i] % (i + 1)`, and `row_probs` supplies `P(state 0)` for
/// the root prior followed by the two rows of each child's CPT.
///
/// # Panics
/// Panics unless `row_probs.len() >= 2 * parent_choices.len() + 1`.
pub fn random_binary_tree(parent_choices: &[usize], row_probs: &[f64]) -> TreeBlueprint {
    let n = parent_choices.len() + 1;
    assert!(
        row_probs.len() >= 2 * n - 1,
        "need {} row probabilities, got {}",
        2 * n - 1,
        row_probs.len()
    );
    let mut parents = vec![None];
    parents.extend(
        parent_choices
            .iter()
            .enumerate()
            .map(|(i, &choice)| Some(choice % (i + 1))),
    );
    let mut tables = vec![vec![row_probs[0], 1.0 - row_probs[0]]];
    for i in 1..n {
        let (a, b) = (row_probs[2 * i - 1], row_probs[2 * i]);
        tables.push(vec![a, 1.0 - a, b, 1.0 - b]);
    }
    TreeBlueprint {
        parents,
        cardinalities: vec![2; n],
        tables,
        labels: vec![None; n],
    }
}

/// Root with prior `[0.7, 0.3]` and one child using `LINK_TABLE`.
pub fn two_node_chain() -> TreeBlueprint {
    TreeBlueprint::binary(vec![None, Some(0)], [0.7, 0.3])
}

/// `0 -> 1 -> ... -> n-1` with a uniform root prior.
pub fn chain(n: usize) -> TreeBlueprint {
    let parents = (0..n).map(|i| i.checked_sub(1)).collect();
    TreeBlueprint::binary(parents, [0.5, 0.5])
}

/// Root `0` with `leaves` direct children.
pub fn star(leaves: usize) -> TreeBlueprint {
    let parents = (0..=leaves).map(|i| (i > 0).then_some(0)).collect();
    TreeBlueprint::binary(parents, [0.6, 0.4])
}

/// Skill tree of an adaptive math drill. State 1 means "mastered"; a skill
/// is likely mastered only if its prerequisite is.
///
/// ```text
/// 0 arithmetic
/// ├── 1 addition
/// │   └── 3 carrying
/// ├── 2 subtraction
/// │   └── 4 borrowing
/// └── 5 multiplication
///     └── 6 long division
/// ```
pub fn skill_tree() -> TreeBlueprint {
    let parents = vec![None, Some(0), Some(0), Some(1), Some(2), Some(0), Some(5)];
    let mut blueprint = TreeBlueprint::binary(parents, [0.4, 0.6]).with_labels(&[
        "arithmetic",
        "addition",
        "subtraction",
        "carrying",
        "borrowing",
        "multiplication",
        "long division",
    ]);
    let prerequisite = vec![0.95, 0.05, 0.3, 0.7];
    for table in blueprint.tables.iter_mut().skip(1) {
        *table = prerequisite.clone();
    }
    blueprint
}

/// Route tracing output through the test writer. Safe to call repeatedly.
pub fn init_test_tracing() {
    let filter = std::env::var(pearl_observability::tracing_setup::LOG_ENV_VAR)
        .unwrap_or_else(|_| "warn".to_string());
    pearl_observability::init_tracing_with_filter(&filter);
}

/// Largest absolute difference between two families of distributions.
pub fn max_abs_diff(a: &[Vec<f64>], b: &[Vec<f64>]) -> f64 {
    a.iter()
        .zip(b)
        .flat_map(|(x, y)| x.iter().zip(y).map(|(p, q)| (p - q).abs()))
        .fold(0.0, f64::max)
}
