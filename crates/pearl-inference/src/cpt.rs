//! Conditional probability tables with mixed-radix indexing.
//!
//! Entries are laid out with the node's own state as the least significant
//! digit and parent states above it, in parent order. For a binary node with
//! one binary parent that is `[P(0|0), P(1|0), P(0|1), P(1|1)]`.

use pearl_core::config::ValidationConfig;
use pearl_core::errors::{ConfigurationError, PearlError, PearlResult};
use pearl_core::NodeId;

/// Encode `digits` in the mixed radix given by `radices` (most significant first).
pub fn encode(digits: &[usize], radices: &[usize]) -> usize {
    digits
        .iter()
        .zip(radices)
        .fold(0, |index, (&digit, &radix)| index * radix + digit)
}

/// A node's CPT.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalTable {
    cardinality: usize,
    parent_cardinalities: Vec<usize>,
    values: Vec<f64>,
}

impl ConditionalTable {
    /// Number of entries a table for this layout holds.
    pub fn expected_len(cardinality: usize, parent_cardinalities: &[usize]) -> usize {
        parent_cardinalities.iter().product::<usize>() * cardinality
    }

    /// Build and validate a table for `node`.
    ///
    /// The length must match the layout exactly. Every value must be a finite
    /// probability, and with `require_normalized_rows` every row must sum to
    /// one within `row_tolerance`.
    pub fn new(
        node: NodeId,
        cardinality: usize,
        parent_cardinalities: Vec<usize>,
        values: &[f64],
        validation: &ValidationConfig,
    ) -> PearlResult<Self> {
        let expected = Self::expected_len(cardinality, &parent_cardinalities);
        if values.len() != expected {
            return Err(ConfigurationError::ProbabilityCountMismatch {
                node,
                expected,
                actual: values.len(),
            }
            .into());
        }

        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(ConfigurationError::InvalidProbability { node, index, value }.into());
        }

        if validation.require_normalized_rows {
            for (row, chunk) in values.chunks(cardinality).enumerate() {
                let sum: f64 = chunk.iter().sum();
                if (sum - 1.0).abs() > validation.row_tolerance {
                    return Err(ConfigurationError::UnnormalizedRow { node, row, sum }.into());
                }
            }
        }

        let mut owned = Vec::new();
        owned
            .try_reserve_exact(expected)
            .map_err(|_| PearlError::AllocationFailure {
                what: format!("CPT of node {node}"),
                requested: expected,
            })?;
        owned.extend_from_slice(values);

        Ok(Self {
            cardinality,
            parent_cardinalities,
            values: owned,
        })
    }

    /// Flat index of `state` under the given parent assignment.
    pub fn index(&self, parent_states: &[usize], state: usize) -> usize {
        encode(parent_states, &self.parent_cardinalities) * self.cardinality + state
    }

    /// `P(self = state | parent = parent_state)` for a single-parent table.
    pub fn conditional(&self, parent_state: usize, state: usize) -> f64 {
        self.values[self.index(&[parent_state], state)]
    }

    /// `P(self = state)` for a parentless table.
    pub fn prior(&self, state: usize) -> f64 {
        self.values[state]
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn parent_cardinalities(&self) -> &[usize] {
        &self.parent_cardinalities
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows in index order, one per parent assignment.
    pub fn rows(&self) -> std::slice::Chunks<'_, f64> {
        self.values.chunks(self.cardinality)
    }

    /// Whether this table fits a node with the given layout.
    pub fn matches_layout(&self, cardinality: usize, parent_cardinalities: &[usize]) -> bool {
        self.cardinality == cardinality && self.parent_cardinalities == parent_cardinalities
    }
}
