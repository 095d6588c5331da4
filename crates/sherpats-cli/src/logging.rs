//! Diagnostic logging to stderr
//!
//! Stdout carries the generated module, so log output never goes there.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `-v` nor `RUST_LOG` is given
const DEFAULT_FILTER: &str = "warn";

/// Install the global fmt subscriber.
///
/// Installing twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let directives = filter_directives(verbose, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pick the filter directives: `-v` wins, then `RUST_LOG`, then the default.
fn filter_directives(verbose: bool, env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match env {
        Some(env) if !env.trim().is_empty() => env,
        _ => DEFAULT_FILTER.to_string(),
    }
}
