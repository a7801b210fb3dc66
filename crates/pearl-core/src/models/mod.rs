mod belief_snapshot;
mod propagation_report;

pub use belief_snapshot::{BeliefSnapshot, NodeBelief};
pub use propagation_report::{MessageDirection, PropagationMessage, PropagationReport};
