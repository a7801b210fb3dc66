use serde::{Deserialize, Serialize};

use super::defaults;

/// CPT validation applied by `set_probabilities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require each CPT row (one parent assignment) to sum to one.
    pub require_normalized_rows: bool,
    /// Allowed deviation of a row sum from one.
    pub row_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_normalized_rows: defaults::DEFAULT_REQUIRE_NORMALIZED_ROWS,
            row_tolerance: defaults::DEFAULT_ROW_TOLERANCE,
        }
    }
}
