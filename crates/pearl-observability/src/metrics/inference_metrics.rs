use serde::{Deserialize, Serialize};

use pearl_core::errors::{PearlError, PearlResult};
use pearl_core::models::{MessageDirection, PropagationReport};

/// Lifetime counters for one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceMetrics {
    pub sessions_started: u64,
    /// Observations that changed the evidence set.
    pub observations: u64,
    /// Observations repeating an existing one; no-ops.
    pub duplicate_observations: u64,
    /// Observations that contradicted existing evidence.
    pub conflicting_observations: u64,
    pub lambda_messages: u64,
    pub pi_messages: u64,
    /// Posterior writes across all nodes.
    pub posterior_updates: u64,
    /// Propagations aborted by an error.
    pub failed_propagations: u64,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a propagation report into the message counters.
    pub fn record_report(&mut self, report: &PropagationReport) {
        self.lambda_messages += report.count(MessageDirection::Upward) as u64;
        self.pi_messages += report.count(MessageDirection::Downward) as u64;
        self.posterior_updates += report.updated.len() as u64;
    }

    pub fn session_started(&mut self, report: &PropagationReport) {
        self.sessions_started += 1;
        self.record_report(report);
    }

    pub fn observed(&mut self, report: &PropagationReport) {
        self.observations += 1;
        self.record_report(report);
    }

    pub fn duplicate_observed(&mut self) {
        self.duplicate_observations += 1;
    }

    pub fn conflict_observed(&mut self) {
        self.conflicting_observations += 1;
    }

    pub fn propagation_failed(&mut self) {
        self.failed_propagations += 1;
    }

    /// Total messages processed.
    pub fn messages(&self) -> u64 {
        self.lambda_messages + self.pi_messages
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize the counters to JSON for export.
    pub fn snapshot(&self) -> PearlResult<serde_json::Value> {
        serde_json::to_value(self).map_err(PearlError::SerializationError)
    }
}
