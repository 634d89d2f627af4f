//! Diagnostic logging setup
//!
//! Diagnostics go to stderr so stdout carries only command output. The filter
//! comes from `BLOCKMARK_LOG`, then `RUST_LOG`, and defaults to `warn`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("BLOCKMARK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber; later calls are ignored
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
