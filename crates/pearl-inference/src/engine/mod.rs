//! Inference engine: session start and evidence assertion.

mod propagation;

use pearl_core::config::{ConflictPolicy, InferenceConfig};
use pearl_core::errors::{ConfigurationError, InferenceError, PearlResult};
use pearl_core::models::PropagationReport;
use pearl_core::traits::ITreeTopology;
use pearl_core::NodeId;

use crate::cpt::ConditionalTable;
use crate::evidence::EvidenceSet;
use crate::record::ProbabilityRecord;

use propagation::Propagator;

/// What an observation did.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserveOutcome {
    /// New evidence was propagated.
    Applied(PropagationReport),
    /// The node was already observed in the same state; nothing changed.
    Duplicate,
    /// A conflicting observation replaced the old one: the session was
    /// restarted and the whole evidence log replayed.
    Reasserted(PropagationReport),
}

impl ObserveOutcome {
    /// The report of the work done, empty for duplicates.
    pub fn into_report(self) -> PropagationReport {
        match self {
            ObserveOutcome::Applied(report) | ObserveOutcome::Reasserted(report) => report,
            ObserveOutcome::Duplicate => PropagationReport::default(),
        }
    }
}

/// Drives Pearl's message passing over a topology and its records.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    conflict_policy: ConflictPolicy,
}

impl InferenceEngine {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            conflict_policy: config.conflict_policy,
        }
    }

    /// Start a session: clear evidence, reset every record to "no evidence",
    /// seed the root with its prior, and push causal messages down the tree.
    ///
    /// Afterwards every posterior equals the node's prior marginal.
    pub fn start_session(
        &self,
        topology: &dyn ITreeTopology,
        records: &mut [ProbabilityRecord],
        evidence: &mut EvidenceSet,
    ) -> PearlResult<PropagationReport> {
        let root = topology.root()?;
        check_tables(topology, records)?;

        evidence.clear();
        for (node, record) in records.iter_mut().enumerate() {
            let parent_card = topology
                .parent_of(node)
                .map_or(0, |p| topology.cardinality(p));
            record.reset(node, topology.cardinality(node), parent_card)?;
        }

        let mut report = PropagationReport::default();
        {
            let record = &mut records[root];
            let cpt = record
                .cpt
                .as_ref()
                .ok_or(ConfigurationError::MissingProbabilities { node: root })?;
            for (state, pi) in record.pi_value.iter_mut().enumerate() {
                *pi = cpt.prior(state);
            }
            record.update_posterior(root)?;
            report.updated.push(root);
        }

        let mut propagator = Propagator::new(topology, records, evidence, report);
        propagator.enqueue_children(root, None);
        propagator.run()
    }

    /// Observe `node` in `state` and propagate the consequences.
    pub fn observe(
        &self,
        topology: &dyn ITreeTopology,
        records: &mut [ProbabilityRecord],
        evidence: &mut EvidenceSet,
        node: NodeId,
        state: usize,
    ) -> PearlResult<ObserveOutcome> {
        let node_count = topology.node_count();
        if node >= node_count || node >= records.len() {
            return Err(ConfigurationError::NodeOutOfRange { node, node_count }.into());
        }
        let cardinality = topology.cardinality(node);
        if state >= cardinality {
            return Err(ConfigurationError::StateOutOfRange {
                node,
                state,
                cardinality,
            }
            .into());
        }

        if let Some(existing) = evidence.state_of(node) {
            if existing == state {
                return Ok(ObserveOutcome::Duplicate);
            }
            return match self.conflict_policy {
                ConflictPolicy::Reject => Err(InferenceError::ConflictingEvidence {
                    node,
                    existing,
                    requested: state,
                }
                .into()),
                ConflictPolicy::Reassert => {
                    let log: Vec<(NodeId, usize)> = evidence
                        .iter()
                        .map(|(n, s)| if n == node { (n, state) } else { (n, s) })
                        .collect();
                    let mut report = self.start_session(topology, records, evidence)?;
                    for (n, s) in log {
                        report.extend(assert_evidence(topology, records, evidence, n, s)?);
                    }
                    Ok(ObserveOutcome::Reasserted(report))
                }
            };
        }

        assert_evidence(topology, records, evidence, node, state).map(ObserveOutcome::Applied)
    }
}

/// Clamp `node` to `state`, register it, and propagate up and down.
///
/// The current posterior is `P(node | evidence so far)`, so a zero there
/// means the combined evidence is impossible; nothing is touched then.
fn assert_evidence(
    topology: &dyn ITreeTopology,
    records: &mut [ProbabilityRecord],
    evidence: &mut EvidenceSet,
    node: NodeId,
    state: usize,
) -> PearlResult<PropagationReport> {
    let mass = records[node].posterior.get(state).copied().unwrap_or(0.0);
    if !(mass > 0.0 && mass.is_finite()) {
        return Err(InferenceError::InconsistentEvidence { node, sum: mass }.into());
    }
    records[node].clamp(state);
    evidence.register(node, state);

    let report = PropagationReport {
        messages: Vec::new(),
        updated: vec![node],
    };
    let mut propagator = Propagator::new(topology, records, evidence, report);
    propagator.enqueue_parent(node);
    propagator.enqueue_children(node, None);
    propagator.run()
}

/// Every node needs a CPT whose layout matches the current topology.
fn check_tables(topology: &dyn ITreeTopology, records: &[ProbabilityRecord]) -> PearlResult<()> {
    for node in 0..topology.node_count() {
        let cpt = records
            .get(node)
            .and_then(ProbabilityRecord::cpt)
            .ok_or(ConfigurationError::MissingProbabilities { node })?;
        let cardinality = topology.cardinality(node);
        let parent_cards: Vec<usize> = topology
            .parent_of(node)
            .map(|p| topology.cardinality(p))
            .into_iter()
            .collect();
        if !cpt.matches_layout(cardinality, &parent_cards) {
            return Err(ConfigurationError::ProbabilityCountMismatch {
                node,
                expected: ConditionalTable::expected_len(cardinality, &parent_cards),
                actual: cpt.len(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pearl_core::config::ValidationConfig;

    /// Root 0 with a single child 1, both binary.
    struct Pair;

    impl ITreeTopology for Pair {
        fn node_count(&self) -> usize {
            2
        }
        fn root(&self) -> PearlResult<NodeId> {
            Ok(0)
        }
        fn parent_of(&self, node: NodeId) -> Option<NodeId> {
            (node == 1).then_some(0)
        }
        fn children_of(&self, node: NodeId) -> Vec<NodeId> {
            if node == 0 {
                vec![1]
            } else {
                Vec::new()
            }
        }
        fn parent_count(&self, node: NodeId) -> usize {
            usize::from(node == 1)
        }
        fn cardinality(&self, _node: NodeId) -> usize {
            2
        }
    }

    fn records() -> Vec<ProbabilityRecord> {
        let validation = ValidationConfig::default();
        let mut records = vec![ProbabilityRecord::new(), ProbabilityRecord::new()];
        records[0].cpt = Some(ConditionalTable::new(0, 2, vec![], &[0.7, 0.3], &validation).unwrap());
        records[1].cpt =
            Some(ConditionalTable::new(1, 2, vec![2], &[0.9, 0.1, 0.2, 0.8], &validation).unwrap());
        records
    }

    #[test]
    fn engine_works_against_any_topology() {
        let engine = InferenceEngine::default();
        let mut records = records();
        let mut evidence = EvidenceSet::new(2);

        let report = engine.start_session(&Pair, &mut records, &mut evidence).unwrap();
        assert_eq!(report.updated, vec![0, 1]);
        assert!((records[1].posterior()[0] - 0.69).abs() < 1e-12);

        let outcome = engine.observe(&Pair, &mut records, &mut evidence, 1, 1).unwrap();
        assert!(matches!(outcome, ObserveOutcome::Applied(_)));
        assert!((records[0].posterior()[1] - 0.24 / 0.31).abs() < 1e-12);

        let again = engine.observe(&Pair, &mut records, &mut evidence, 1, 1).unwrap();
        assert_eq!(again, ObserveOutcome::Duplicate);
        assert!(again.into_report().is_empty());
    }

    #[test]
    fn mismatched_table_blocks_session() {
        let engine = InferenceEngine::default();
        let mut records = records();
        records[1].cpt = Some(
            ConditionalTable::new(1, 2, vec![], &[0.5, 0.5], &ValidationConfig::default()).unwrap(),
        );
        let err = engine
            .start_session(&Pair, &mut records, &mut EvidenceSet::new(2))
            .unwrap_err();
        assert!(matches!(
            err,
            pearl_core::errors::PearlError::Configuration(
                ConfigurationError::ProbabilityCountMismatch { node: 1, expected: 4, actual: 2 }
            )
        ));
    }
}
