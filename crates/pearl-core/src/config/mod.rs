pub mod defaults;
mod inference_config;
mod observability_config;
mod validation_config;

pub use inference_config::{ConflictPolicy, InferenceConfig};
pub use observability_config::ObservabilityConfig;
pub use validation_config::ValidationConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{PearlError, PearlResult};

/// Top-level configuration, one section per subsystem.
/// Every section falls back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PearlConfig {
    pub inference: InferenceConfig,
    pub validation: ValidationConfig,
    pub observability: ObservabilityConfig,
}

impl PearlConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(source: &str) -> PearlResult<Self> {
        toml::from_str(source).map_err(|e| PearlError::ConfigParse {
            reason: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> PearlResult<String> {
        toml::to_string(self).map_err(|e| PearlError::ConfigParse {
            reason: e.to_string(),
        })
    }
}
