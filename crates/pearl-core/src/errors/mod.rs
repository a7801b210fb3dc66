mod configuration_error;
mod inference_error;
mod pearl_error;

pub use configuration_error::ConfigurationError;
pub use inference_error::InferenceError;
pub use pearl_error::{PearlError, PearlResult};
