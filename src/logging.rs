use std::env;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a given number of `-v` flags
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Send diagnostics to stderr. `RUST_LOG` wins over the verbosity flags.
pub fn init_logger(verbosity: u8) {
    let filter = env::var("RUST_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
