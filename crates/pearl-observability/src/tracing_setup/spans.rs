//! Span definitions per operation: session start, observation, structure edits.

/// Create a session-start span.
#[macro_export]
macro_rules! session_span {
    ($node_count:expr) => {
        tracing::info_span!("pearl.session", node_count = $node_count)
    };
}

/// Create an observation span.
#[macro_export]
macro_rules! observe_span {
    ($node:expr, $state:expr) => {
        tracing::info_span!("pearl.observe", node = $node, state = $state)
    };
}

/// Create a structure-edit span.
#[macro_export]
macro_rules! structure_span {
    ($op:expr, $parent:expr, $child:expr) => {
        tracing::debug_span!("pearl.structure", op = $op, parent = $parent, child = $child)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SESSION: &str = "pearl.session";
    pub const OBSERVE: &str = "pearl.observe";
    pub const STRUCTURE: &str = "pearl.structure";
}
