//! Tracing setup: structured logging with span definitions.

pub mod spans;

use pearl_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "PEARL_LOG";

/// Install the global subscriber described by `config`.
///
/// `PEARL_LOG` wins over `config.log_level` when set. Returns `false` if a
/// global subscriber was already installed, which is expected in tests.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    }
}

/// Initialize tracing with a custom filter string, writing through the test
/// writer so output is captured per test.
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init()
        .is_ok()
}
