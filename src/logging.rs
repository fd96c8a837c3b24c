// src/logging.rs
//
// Log output for the binary. The library only uses the `log` facade;
// its records are bridged into tracing and formatted by tracing-subscriber.

use log::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Filter for `level`. RUST_LOG, when set and valid, takes precedence.
pub fn build_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(level)))
}

/// `log` level as an EnvFilter directive ("off", "error", ..., "trace")
pub fn level_directive(level: LevelFilter) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install the global subscriber and the `log` bridge.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(level: LevelFilter) -> bool {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init();

    match result {
        Ok(()) => true,
        Err(err) => {
            log::debug!("Logging already initialized: {}", err);
            false
        }
    }
}
