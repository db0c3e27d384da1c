//! Diagnostic logging setup
//!
//! Logs go to stderr so report output on stdout stays machine-readable.
//! `RUST_LOG` overrides the level chosen from the CLI flags.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "warn,depinspect=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbose)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
