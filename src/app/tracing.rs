use crate::domain::LogLevel;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the subscriber for multilog's own diagnostics.
///
/// Writes to stderr so it never mixes with console backend output on stdout.
/// Uses JSON format when `RUST_LOG_FORMAT=json`. `RUST_LOG` directives are
/// added on top of `default_level`.
pub fn init_tracing(default_level: LogLevel) {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let level: tracing::Level = default_level.into();
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::from_level(level).into());

    // A subscriber may already be installed (tests, embedding applications).
    let result = if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {e}");
    }
}
