//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "prep_lines=info";

/// Initialize tracing. Callers can install their own subscriber; this helper
/// installs an env-filtered fmt subscriber only if none is set, falling back to
/// [`DEFAULT_DIRECTIVE`] when `RUST_LOG` is absent or unparsable.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}
