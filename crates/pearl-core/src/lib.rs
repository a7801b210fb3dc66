//! # pearl-core
//!
//! Foundation crate for the Pearl belief network engine.
//! Defines the shared types, the topology trait, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

/// Index of a node in a network, stable for the network's lifetime.
pub type NodeId = usize;

// Re-export the most commonly used types at the crate root.
pub use config::PearlConfig;
pub use errors::{ConfigurationError, InferenceError, PearlError, PearlResult};
pub use models::{BeliefSnapshot, MessageDirection, PropagationMessage, PropagationReport};
pub use traits::ITreeTopology;
