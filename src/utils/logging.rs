//! Logging utilities
//!
//! Provides logging setup for the client binary.

use env_logger::Env;

/// Setup logging; `RUST_LOG` overrides the default level.
///
/// The default stays at `warn` so log records do not interleave with the
/// interactive transcript.
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
}
