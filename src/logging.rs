//! Logging init for the command-line binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "SAMPLEFETCH_LOG";

/// Default filter directives for a `-v` count.
///
/// At the default verbosity our own `info` events (such as the notice that
/// existing files are being replaced) are shown.
pub fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,samplefetch=info",
        1 => "info,samplefetch=debug",
        _ => "debug,samplefetch=trace",
    }
}

/// Initialize structured logging to stderr.
///
/// `SAMPLEFETCH_LOG` wins over `verbosity` when set. Calling this twice is
/// harmless; the first subscriber stays installed.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
