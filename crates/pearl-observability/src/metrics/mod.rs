//! Inference counters.

mod inference_metrics;

pub use inference_metrics::InferenceMetrics;
