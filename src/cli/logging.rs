use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives.
pub const LOG_ENV: &str = "SIDTAG_LOG";

/// Initialize the stderr tracing subscriber.
///
/// `SIDTAG_LOG` takes precedence; otherwise `info`, or `debug` with `verbose`.
///
/// ANSI escapes follow the same decision `colored` makes for the report, so
/// `NO_COLOR` silences both.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(colored::control::SHOULD_COLORIZE.should_colorize())
        .with_writer(io::stderr)
        .try_init();
}
