use super::{ConfigurationError, InferenceError};

/// Convenience alias used throughout the workspace.
pub type PearlResult<T> = Result<T, PearlError>;

/// Top-level error for every Pearl operation.
#[derive(Debug, thiserror::Error)]
pub enum PearlError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("allocation failed for {what}: {requested} elements")]
    AllocationFailure { what: String, requested: usize },

    #[error("config parse error: {reason}")]
    ConfigParse { reason: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PearlError {
    /// Whether the error came from the network's structure or setup rather than the evidence.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PearlError::Configuration(_))
    }

    /// Whether the error was raised by evidence propagation.
    pub fn is_inference(&self) -> bool {
        matches!(self, PearlError::Inference(_))
    }
}
