//! Tracing setup
//!
//! Logs go to stderr so command output on stdout stays clean. `RUST_LOG`
//! wins over the configured level; an unparsable filter falls back to `info`.

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Build the filter from `RUST_LOG`, then the settings, then `info`
pub fn build_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber; later calls are ignored
pub fn init(settings: &Settings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(settings))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
