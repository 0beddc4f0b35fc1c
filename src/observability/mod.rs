//! Observability infrastructure: phase tracking and tracing setup.
//!
//! The core never writes to stdout or stderr. It emits `tracing` events
//! inside one span per [`AnalysisPhase`]; an embedding driver decides where
//! they go, typically by calling [`init_tracing`] once at startup.

pub mod context;

pub use context::{current_phase, set_phase, with_phase, AnalysisPhase, PhaseGuard};

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honouring `RUST_LOG`.
///
/// Falls back to `default_filter` when `RUST_LOG` is unset or invalid.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("hexarch=debug");
        init_tracing("hexarch=info");
    }
}
