use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{PreviewConfig, LOG_ENV};
use crate::error::{PreviewError, Result};

/// Install the global subscriber. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init_tracing(config: &PreviewConfig) -> Result<WorkerGuard> {
    let dir = config.resolved_log_dir();
    fs::create_dir_all(&dir).map_err(|source| PreviewError::Io {
        path: dir.clone(),
        source,
    })?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_directive))
        .map_err(|e| PreviewError::Config(format!("log_directive: {}", e)))?;

    let appender = tracing_appender::rolling::never(&dir, "preview.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(guard)
}
