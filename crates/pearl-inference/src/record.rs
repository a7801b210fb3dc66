//! Per-node probability record: the CPT plus the message-passing scratch state.

use pearl_core::errors::{InferenceError, PearlError, PearlResult};
use pearl_core::NodeId;

use crate::cpt::ConditionalTable;

/// Allocate a vector of `len` copies of `value`, reporting allocation failure.
pub(crate) fn filled(len: usize, value: f64, what: &str) -> PearlResult<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| PearlError::AllocationFailure {
            what: what.to_string(),
            requested: len,
        })?;
    v.resize(len, value);
    Ok(v)
}

/// Probability state of one node.
///
/// `lambda_value`, `pi_value` and `posterior` range over the node's own
/// states; `lambda_message` (sent to the parent) and `pi_message` (received
/// from the parent) range over the parent's states and are empty for the root.
#[derive(Debug, Clone, Default)]
pub struct ProbabilityRecord {
    pub(crate) cpt: Option<ConditionalTable>,
    pub(crate) lambda_value: Vec<f64>,
    pub(crate) lambda_message: Vec<f64>,
    pub(crate) pi_value: Vec<f64>,
    pub(crate) pi_message: Vec<f64>,
    pub(crate) posterior: Vec<f64>,
}

impl ProbabilityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cpt(&self) -> Option<&ConditionalTable> {
        self.cpt.as_ref()
    }

    pub fn lambda_value(&self) -> &[f64] {
        &self.lambda_value
    }

    pub fn lambda_message(&self) -> &[f64] {
        &self.lambda_message
    }

    pub fn pi_value(&self) -> &[f64] {
        &self.pi_value
    }

    pub fn pi_message(&self) -> &[f64] {
        &self.pi_message
    }

    pub fn posterior(&self) -> &[f64] {
        &self.posterior
    }

    /// Reset to "no evidence anywhere": all lambda and pi messages uniform.
    pub(crate) fn reset(
        &mut self,
        node: NodeId,
        cardinality: usize,
        parent_cardinality: usize,
    ) -> PearlResult<()> {
        let what = format!("record of node {node}");
        self.lambda_value = filled(cardinality, 1.0, &what)?;
        self.lambda_message = filled(parent_cardinality, 1.0, &what)?;
        self.pi_value = filled(cardinality, 0.0, &what)?;
        self.pi_message = filled(parent_cardinality, 1.0, &what)?;
        self.posterior = filled(cardinality, 0.0, &what)?;
        Ok(())
    }

    /// Fix the node to `state`: lambda, pi and posterior become one-hot.
    pub(crate) fn clamp(&mut self, state: usize) {
        for buf in [&mut self.lambda_value, &mut self.pi_value, &mut self.posterior] {
            for (i, v) in buf.iter_mut().enumerate() {
                *v = if i == state { 1.0 } else { 0.0 };
            }
        }
    }

    /// `posterior ∝ lambda_value ⊙ pi_value`, normalized to sum to one.
    pub(crate) fn update_posterior(&mut self, node: NodeId) -> Result<(), InferenceError> {
        let mut sum = 0.0;
        for ((post, lambda), pi) in self
            .posterior
            .iter_mut()
            .zip(&self.lambda_value)
            .zip(&self.pi_value)
        {
            *post = lambda * pi;
            sum += *post;
        }
        if !(sum > 0.0 && sum.is_finite()) {
            return Err(InferenceError::InconsistentEvidence { node, sum });
        }
        for post in &mut self.posterior {
            *post /= sum;
        }
        Ok(())
    }
}
