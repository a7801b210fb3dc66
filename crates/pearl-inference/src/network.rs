//! Network: owns the graph, the probability records, and the evidence set,
//! and exposes the construction and session API.

use pearl_core::config::PearlConfig;
use pearl_core::errors::{ConfigurationError, InferenceError, PearlError, PearlResult};
use pearl_core::models::{BeliefSnapshot, NodeBelief, PropagationReport};
use pearl_core::traits::ITreeTopology;
use pearl_core::NodeId;
use pearl_graph::{tree_enforcement, TreeGraph};
use pearl_observability::{observe_span, session_span, structure_span, InferenceMetrics};

use crate::cpt::ConditionalTable;
use crate::engine::{InferenceEngine, ObserveOutcome};
use crate::evidence::EvidenceSet;
use crate::record::ProbabilityRecord;

/// A tree-structured Bayesian network and its inference session.
///
/// Build the structure first (`add_link`, `set_cardinality`), then assign a
/// CPT to every node, then `start_session` and `observe`. Structural edits
/// discard the CPTs whose layout they change and end the session.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) graph: TreeGraph,
    pub(crate) records: Vec<ProbabilityRecord>,
    pub(crate) evidence: EvidenceSet,
    engine: InferenceEngine,
    config: PearlConfig,
    metrics: InferenceMetrics,
    session_active: bool,
}

impl Network {
    /// Create `node_count` isolated nodes with the default configuration.
    pub fn create(node_count: usize) -> PearlResult<Self> {
        Self::with_config(node_count, PearlConfig::default())
    }

    /// Create `node_count` isolated nodes.
    pub fn with_config(node_count: usize, config: PearlConfig) -> PearlResult<Self> {
        if node_count == 0 {
            return Err(ConfigurationError::EmptyNetwork.into());
        }
        let cardinality = config.inference.default_cardinality;
        if !(pearl_core::constants::MIN_CARDINALITY..=pearl_core::constants::MAX_CARDINALITY)
            .contains(&cardinality)
        {
            return Err(ConfigurationError::InvalidCardinality {
                node: 0,
                cardinality,
            }
            .into());
        }

        let mut records = Vec::new();
        records
            .try_reserve_exact(node_count)
            .map_err(|_| PearlError::AllocationFailure {
                what: "probability records".to_string(),
                requested: node_count,
            })?;
        records.resize_with(node_count, ProbabilityRecord::new);

        tracing::debug!(node_count, cardinality, "network created");
        Ok(Self {
            graph: TreeGraph::with_cardinality(node_count, cardinality),
            records,
            evidence: EvidenceSet::new(node_count),
            engine: InferenceEngine::new(&config.inference),
            config,
            metrics: InferenceMetrics::new(),
            session_active: false,
        })
    }

    // --- Structure ---

    /// Add the causal link `parent` → `child`.
    pub fn add_link(&mut self, parent: NodeId, child: NodeId) -> PearlResult<()> {
        let _span = structure_span!("add", parent, child).entered();
        self.graph.insert_edge(parent, child)?;
        self.discard_table(child);
        self.end_session("structure changed");
        Ok(())
    }

    /// Remove the causal link `parent` → `child`.
    pub fn remove_link(&mut self, parent: NodeId, child: NodeId) -> PearlResult<()> {
        let _span = structure_span!("remove", parent, child).entered();
        self.graph.remove_edge(parent, child)?;
        self.discard_table(child);
        self.end_session("structure changed");
        Ok(())
    }

    /// Give `node` `cardinality` states. Discards the CPTs of the node and
    /// its children, whose layouts depend on it.
    pub fn set_cardinality(&mut self, node: NodeId, cardinality: usize) -> PearlResult<()> {
        self.graph.index(node)?;
        if self.graph.cardinality(node) == cardinality {
            return Ok(());
        }
        self.graph.set_cardinality(node, cardinality)?;
        self.discard_table(node);
        for child in self.graph.children_of(node) {
            self.discard_table(child);
        }
        self.end_session("cardinality changed");
        Ok(())
    }

    pub fn set_label(&mut self, node: NodeId, label: impl Into<String>) -> PearlResult<()> {
        self.graph.set_label(node, label)
    }

    // --- Probabilities ---

    /// Number of CPT entries `node` expects under the current structure.
    pub fn expected_len(&self, node: NodeId) -> PearlResult<usize> {
        self.graph.index(node)?;
        Ok(ConditionalTable::expected_len(
            self.graph.cardinality(node),
            &self.parent_cardinalities(node),
        ))
    }

    /// Assign the CPT of `node`. `values` must hold exactly
    /// [`expected_len`](Self::expected_len) entries in mixed-radix order.
    pub fn set_probabilities(&mut self, node: NodeId, values: &[f64]) -> PearlResult<()> {
        self.graph.index(node)?;
        let table = ConditionalTable::new(
            node,
            self.graph.cardinality(node),
            self.parent_cardinalities(node),
            values,
            &self.config.validation,
        )?;
        self.records[node].cpt = Some(table);
        self.end_session("probabilities changed");
        Ok(())
    }

    /// The CPT values of `node`, if assigned.
    pub fn probabilities(&self, node: NodeId) -> Option<&[f64]> {
        self.records
            .get(node)
            .and_then(ProbabilityRecord::cpt)
            .map(ConditionalTable::values)
    }

    // --- Session ---

    /// Start (or restart) an inference session. Call once the structure and
    /// every CPT are final.
    pub fn start_session(&mut self) -> PearlResult<PropagationReport> {
        let _span = session_span!(self.graph.node_count()).entered();
        self.session_active = false;
        tree_enforcement::validate_tree(&self.graph)?;

        match self
            .engine
            .start_session(&self.graph, &mut self.records, &mut self.evidence)
        {
            Ok(report) => {
                self.session_active = true;
                self.metrics.session_started(&report);
                tracing::info!(messages = report.messages.len(), "session started");
                Ok(report)
            }
            Err(e) => {
                if e.is_inference() {
                    self.metrics.propagation_failed();
                }
                tracing::warn!(error = %e, "session start failed");
                Err(e)
            }
        }
    }

    /// Observe `node` in `state` and update every affected posterior.
    ///
    /// Repeating an observation is a no-op returning an empty report. A
    /// conflicting observation follows the configured `ConflictPolicy`.
    /// Any other failure ends the session.
    pub fn observe(&mut self, node: NodeId, state: usize) -> PearlResult<PropagationReport> {
        let _span = observe_span!(node, state).entered();
        if !self.session_active {
            return Err(ConfigurationError::SessionNotStarted.into());
        }

        let result = self.engine.observe(
            &self.graph,
            &mut self.records,
            &mut self.evidence,
            node,
            state,
        );
        match result {
            Ok(ObserveOutcome::Applied(report)) => {
                self.metrics.observed(&report);
                tracing::info!(node, state, updated = report.updated.len(), "evidence propagated");
                Ok(report)
            }
            Ok(ObserveOutcome::Duplicate) => {
                self.metrics.duplicate_observed();
                tracing::debug!(node, state, "repeated observation ignored");
                Ok(PropagationReport::default())
            }
            Ok(ObserveOutcome::Reasserted(report)) => {
                self.metrics.conflict_observed();
                self.metrics.record_report(&report);
                tracing::warn!(node, state, "conflicting observation reasserted");
                Ok(report)
            }
            Err(PearlError::Inference(e @ InferenceError::ConflictingEvidence { .. })) => {
                self.metrics.conflict_observed();
                tracing::warn!(error = %e, "conflicting observation rejected");
                Err(e.into())
            }
            Err(e) => {
                // Out-of-range arguments are rejected before anything is touched.
                if e.is_inference() {
                    self.session_active = false;
                    self.metrics.propagation_failed();
                }
                tracing::warn!(error = %e, "observation failed");
                Err(e)
            }
        }
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    /// Posterior marginal of `node` in the active session.
    pub fn posterior(&self, node: NodeId) -> PearlResult<&[f64]> {
        self.graph.index(node)?;
        if !self.session_active {
            return Err(ConfigurationError::SessionNotStarted.into());
        }
        Ok(self.records[node].posterior())
    }

    /// Posterior of every node plus the evidence log.
    pub fn snapshot(&self) -> PearlResult<BeliefSnapshot> {
        if !self.session_active {
            return Err(ConfigurationError::SessionNotStarted.into());
        }
        let nodes = self
            .records
            .iter()
            .enumerate()
            .map(|(node, record)| NodeBelief {
                node,
                label: self.graph.label(node).map(str::to_string),
                posterior: record.posterior().to_vec(),
                observed: self.evidence.state_of(node),
            })
            .collect();
        Ok(BeliefSnapshot {
            nodes,
            evidence: self.evidence.nodes().to_vec(),
        })
    }

    // --- Accessors ---

    pub fn graph(&self) -> &TreeGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn record(&self, node: NodeId) -> Option<&ProbabilityRecord> {
        self.records.get(node)
    }

    pub fn evidence(&self) -> &EvidenceSet {
        &self.evidence
    }

    pub fn config(&self) -> &PearlConfig {
        &self.config
    }

    pub fn metrics(&self) -> &InferenceMetrics {
        &self.metrics
    }

    /// Diagnostic dump of structure, CPTs, posteriors, and evidence.
    pub fn display(&self) -> String {
        self.to_string()
    }

    // --- Internal ---

    fn parent_cardinalities(&self, node: NodeId) -> Vec<usize> {
        self.graph
            .parent_of(node)
            .map(|p| self.graph.cardinality(p))
            .into_iter()
            .collect()
    }

    fn discard_table(&mut self, node: NodeId) {
        if let Some(record) = self.records.get_mut(node) {
            if record.cpt.take().is_some() {
                tracing::warn!(node, "CPT discarded, layout changed");
            }
        }
    }

    fn end_session(&mut self, reason: &str) {
        if self.session_active {
            self.session_active = false;
            tracing::warn!(reason, "inference session ended");
        }
    }
}
