//! Default values for every config key.

use crate::constants;

// Inference
pub const DEFAULT_NODE_CARDINALITY: usize = constants::DEFAULT_CARDINALITY;

// Validation
pub const DEFAULT_REQUIRE_NORMALIZED_ROWS: bool = true;
pub const DEFAULT_ROW_TOLERANCE: f64 = constants::DEFAULT_ROW_TOLERANCE;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
