// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the CLI.
//
// Diagnostics (skipped URLs, failed fetches, budget reached) go to stderr so
// they never mix with the progress lines on stdout.
//
// RUST_LOG wins when set, e.g.:
//   RUST_LOG=site_harvest=debug,reqwest=warn
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (e.g. from tests) is a no-op instead of a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
