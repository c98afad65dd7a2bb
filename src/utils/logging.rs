//! Logging initialization
//!
//! Sets up the tracing subscriber for the whole process. The filter is
//! taken from `RUST_LOG` when set, falling back to the provided default.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored so tests that
/// each set up logging do not panic.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}
