//! Tracing setup
//!
//! Diagnostics go to a log file under the data directory so that stdout stays
//! reserved for the messages the user asked for.

use std::fs;
use std::path::Path;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LOG_FILTER_ENV, log_path};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// The returned guard flushes buffered log lines on drop and must be held
/// until the process exits. Returns `None` when logging fell back to stderr.
pub fn init() -> Option<WorkerGuard> {
    let filter = std::env::var(LOG_FILTER_ENV).ok();
    init_at(&log_path(), filter.as_deref())
}

fn init_at(path: &Path, filter: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
        return init_stderr();
    };

    if let Err(e) = fs::create_dir_all(dir) {
        init_stderr();
        warn!("Cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Some(guard)
}

fn init_stderr() -> Option<WorkerGuard> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    None
}
