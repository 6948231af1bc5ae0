//! Log output for the server process

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `log` records from every crate are routed
/// through it; `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
