//! Tracing/logging setup shared by every stockroom binary and test harness.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, ObservabilityConfig, ObservabilityError};

/// Initialize process-wide tracing with the given configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &ObservabilityConfig) {
    self::tracing::init(config);
}

/// Initialize tracing from the environment (`RUST_LOG`, `STOCKROOM_LOG_FORMAT`).
///
/// Falls back to the default configuration when the environment is malformed.
pub fn init_from_env() {
    let config = match ObservabilityConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ignoring logging configuration: {err}");
            ObservabilityConfig::default()
        }
    };
    init(&config);
}
