//! Tracing initialization shared by anything that embeds the exercise core.
//!
//! Logs always go to a daily-rolling file under `logs/`; stdout output is
//! opt-in via `LOG_TO_STDOUT`. The filter comes from the configured log
//! level (`LOG_LEVEL` by default).

use crate::config;
use tracing_appender::rolling;

/// Initializes the global tracing subscriber.
///
/// Returns the non-blocking writer guard; the caller must keep it alive for
/// the lifetime of the program or buffered log lines are dropped on exit.
pub fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true);

    let env_filter = EnvFilter::try_new(config::log_level())
        .unwrap_or_else(|_| EnvFilter::new("session=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
