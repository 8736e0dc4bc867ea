//! Tracing subscriber setup.
//!
//! Console output goes to stderr so stdout stays clean for command output.
//! An optional daily-rotated file layer writes to ${SIGO_HOME}/logs.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogConfig, paths};

/// Environment variable overriding `[log] level`.
pub const LOG_ENV: &str = "SIGO_LOG";

const DEFAULT_FILTER: &str = "warn";
const LOG_FILE_NAME: &str = "sigo.log";

/// Picks the filter directive: `SIGO_LOG` > config > default.
fn filter_directive(env_value: Option<&str>, config: &LogConfig) -> String {
    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| config.level.as_deref().map(str::trim).filter(|v| !v.is_empty()))
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Filter directive in effect for `config`, honoring `SIGO_LOG`.
pub fn effective_filter(config: &LogConfig) -> String {
    filter_directive(std::env::var(LOG_ENV).ok().as_deref(), config)
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process. Calling this twice is harmless: only the first
/// installation wins.
///
/// # Errors
/// Returns an error if the filter directive is invalid or the log directory
/// cannot be created.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let directive = effective_filter(config);
    let build_filter = || {
        EnvFilter::try_new(&directive).with_context(|| format!("Invalid log filter: {directive}"))
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(build_filter()?);

    let registry = tracing_subscriber::registry().with(console_layer);

    if !config.file {
        let _ = registry.try_init();
        return Ok(None);
    }

    let dir = paths::logs_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(build_filter()?);

    let _ = registry.with(file_layer).try_init();
    Ok(Some(guard))
}
