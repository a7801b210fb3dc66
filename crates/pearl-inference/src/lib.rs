//! # pearl-inference
//!
//! Exact inference over tree-structured Bayesian networks using Pearl's
//! message passing. A [`Network`] owns the graph, one [`ProbabilityRecord`]
//! per node, and the session's [`EvidenceSet`]; the [`InferenceEngine`]
//! drives session start and evidence propagation through an explicit
//! work queue of tagged messages.

pub mod cpt;
mod display;
pub mod engine;
pub mod evidence;
pub mod network;
pub mod record;

pub use cpt::ConditionalTable;
pub use engine::{InferenceEngine, ObserveOutcome};
pub use evidence::EvidenceSet;
pub use network::Network;
pub use record::ProbabilityRecord;
