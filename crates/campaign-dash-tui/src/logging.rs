//! Tracing setup.
//!
//! The TUI owns the terminal, so while it runs logs go to a daily rolling
//! file. The one-shot CLI commands log to stderr instead.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "campaign-dash.log";

/// Use RUST_LOG to control the level (e.g. RUST_LOG=campaign_dash_core=debug)
fn build_env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, for CLI commands
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(build_env_filter("warn"))
        .init();
}

/// Log to a daily file under `dir`. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init_file(dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = rolling::daily(dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(build_env_filter("info"))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
