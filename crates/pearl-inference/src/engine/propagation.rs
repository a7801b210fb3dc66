//! Work-queue message passing.
//!
//! Messages only travel away from the node that sent them, so in a tree a
//! single run visits every node at most once and the queue never holds more
//! than `node_count` messages.

use std::collections::VecDeque;

use pearl_core::errors::{ConfigurationError, PearlResult};
use pearl_core::models::{MessageDirection, PropagationMessage, PropagationReport};
use pearl_core::traits::ITreeTopology;
use pearl_core::NodeId;

use crate::evidence::EvidenceSet;
use crate::record::ProbabilityRecord;

/// One propagation run over a network's records.
pub(crate) struct Propagator<'a> {
    topology: &'a dyn ITreeTopology,
    records: &'a mut [ProbabilityRecord],
    evidence: &'a EvidenceSet,
    queue: VecDeque<PropagationMessage>,
    report: PropagationReport,
}

impl<'a> Propagator<'a> {
    pub(crate) fn new(
        topology: &'a dyn ITreeTopology,
        records: &'a mut [ProbabilityRecord],
        evidence: &'a EvidenceSet,
        report: PropagationReport,
    ) -> Self {
        Self {
            topology,
            records,
            evidence,
            queue: VecDeque::new(),
            report,
        }
    }

    /// Queue a diagnostic message from `child` to its parent, unless the
    /// child is the root or the parent is evidence.
    pub(crate) fn enqueue_parent(&mut self, child: NodeId) {
        if let Some(parent) = self.topology.parent_of(child) {
            if !self.evidence.contains(parent) {
                self.queue
                    .push_back(PropagationMessage::upward(child, parent));
            }
        }
    }

    /// Queue causal messages from `parent` to every non-evidence child other
    /// than `except`.
    pub(crate) fn enqueue_children(&mut self, parent: NodeId, except: Option<NodeId>) {
        for child in self.topology.children_of(parent) {
            if Some(child) != except && !self.evidence.contains(child) {
                self.queue
                    .push_back(PropagationMessage::downward(parent, child));
            }
        }
    }

    /// Drain the queue.
    pub(crate) fn run(mut self) -> PearlResult<PropagationReport> {
        while let Some(message) = self.queue.pop_front() {
            tracing::debug!(
                direction = ?message.direction,
                source = message.source,
                target = message.target,
                "processing message"
            );
            self.report.messages.push(message);
            match message.direction {
                MessageDirection::Upward => self.send_lambda(message.source, message.target)?,
                MessageDirection::Downward => self.send_pi(message.source, message.target)?,
            }
        }
        Ok(self.report)
    }

    /// Diagnostic message `child` → `parent`.
    fn send_lambda(&mut self, child: NodeId, parent: NodeId) -> PearlResult<()> {
        let parent_card = self.topology.cardinality(parent);

        // lambda_message[i] = Σ_j P(child = j | parent = i) · lambda_value[j]
        {
            let record = &mut self.records[child];
            let cpt = record
                .cpt
                .as_ref()
                .ok_or(ConfigurationError::MissingProbabilities { node: child })?;
            for i in 0..parent_card {
                let mut sum = 0.0;
                for (j, lambda) in record.lambda_value.iter().enumerate() {
                    sum += cpt.conditional(i, j) * lambda;
                }
                record.lambda_message[i] = sum;
            }
        }

        // The parent combines evidence from every branch below it.
        let children = self.topology.children_of(parent);
        for i in 0..parent_card {
            let product: f64 = children
                .iter()
                .map(|&c| self.records[c].lambda_message[i])
                .product();
            self.records[parent].lambda_value[i] = product;
        }
        self.records[parent].update_posterior(parent)?;
        self.report.updated.push(parent);

        self.enqueue_parent(parent);
        self.enqueue_children(parent, Some(child));
        Ok(())
    }

    /// Causal message `parent` → `child`.
    fn send_pi(&mut self, parent: NodeId, child: NodeId) -> PearlResult<()> {
        let parent_card = self.topology.cardinality(parent);

        // pi_message[i] = pi_value(parent)[i] · Π lambda_message[i] over the
        // child's siblings; the child's own branch is left out.
        let siblings = self.topology.children_of(parent);
        for i in 0..parent_card {
            let mut message = self.records[parent].pi_value[i];
            for &sibling in siblings.iter().filter(|&&s| s != child) {
                message *= self.records[sibling].lambda_message[i];
            }
            self.records[child].pi_message[i] = message;
        }

        // pi_value[i] = Σ_j P(child = i | parent = j) · pi_message[j]
        {
            let record = &mut self.records[child];
            let cpt = record
                .cpt
                .as_ref()
                .ok_or(ConfigurationError::MissingProbabilities { node: child })?;
            for i in 0..cpt.cardinality() {
                let mut sum = 0.0;
                for (j, message) in record.pi_message.iter().enumerate() {
                    sum += cpt.conditional(j, i) * message;
                }
                record.pi_value[i] = sum;
            }
        }
        self.records[child].update_posterior(child)?;
        self.report.updated.push(child);

        self.enqueue_children(child, None);
        Ok(())
    }
}
