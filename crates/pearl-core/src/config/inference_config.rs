use serde::{Deserialize, Serialize};

use super::defaults;

/// What `observe` does when a node that already carries evidence is observed
/// in a different state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail with `InferenceError::ConflictingEvidence`; the session is untouched.
    #[default]
    Reject,
    /// Revoke the old observation and assert the new one by restarting the
    /// session and replaying the evidence log.
    Reassert,
}

/// Inference engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Cardinality given to every node at network creation.
    pub default_cardinality: usize,
    /// Handling of conflicting re-observations.
    pub conflict_policy: ConflictPolicy,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            default_cardinality: defaults::DEFAULT_NODE_CARDINALITY,
            conflict_policy: ConflictPolicy::default(),
        }
    }
}
