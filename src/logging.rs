//! tracing subscriber setup for the CLI

use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a compact stderr subscriber.
/// - Respects `RUST_LOG` if set
/// - Otherwise `warn`, or `gocab=debug` when `verbose`
/// - stderr keeps `--json` output on stdout machine-readable
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,gocab=debug"
    } else {
        "warn"
    }
}
