//! Logging Infrastructure
//!
//! Console logging through `tracing-subscriber`. `RUST_LOG` overrides the
//! level passed in.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a human-readable console logger
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_format(level, false)
}

/// Install the console logger, optionally emitting JSON lines
///
/// # Examples
/// ```no_run
/// // Development
/// bookstore_services::logger::init_logger_with_format("debug", false)?;
///
/// // Production
/// bookstore_services::logger::init_logger_with_format("info", true)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_format(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init()?;
    }

    tracing::debug!(level, json_format, "Logger initialized");
    Ok(())
}
