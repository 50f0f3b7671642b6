// src/telemetry.rs
// =============================================================================
// Logging setup.
//
// Logs go to stderr so they never mix with the results printed on stdout.
// RUST_LOG overrides the default level.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let default_filter = if verbose { "pathprobe=debug" } else { "pathprobe=info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
