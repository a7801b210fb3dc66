//! # pearl-observability
//!
//! Structured tracing (subscriber setup and span definitions) and counters
//! describing what the inference engine has done over a network's lifetime.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::InferenceMetrics;
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
