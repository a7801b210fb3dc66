/// Pearl engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of states a node has unless configured otherwise.
pub const DEFAULT_CARDINALITY: usize = 2;

/// Smallest cardinality a discrete variable may have.
pub const MIN_CARDINALITY: usize = 2;

/// Upper bound on a node's cardinality. Keeps CPT sizes sane.
pub const MAX_CARDINALITY: usize = 256;

/// Tolerance used when checking that a CPT row sums to one.
pub const DEFAULT_ROW_TOLERANCE: f64 = 1e-6;

/// Tolerance the posterior invariant is held to after propagation.
pub const POSTERIOR_SUM_TOLERANCE: f64 = 1e-9;
