//! Log output for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count. `None` means quiet.
pub fn filter_directive(verbosity: Option<u8>) -> &'static str {
    match verbosity {
        None => "error",
        Some(0) => "warn",
        Some(1) => "info",
        Some(2) => "debug",
        Some(_) => "trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the verbosity flags.
///
/// Calling this twice keeps the first subscriber.
pub fn init(verbosity: Option<u8>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
