//! Logging setup
//!
//! Development runs log human-readable lines to stdout. Production runs
//! write daily-rolled JSON lines under the work directory instead, so the
//! `security` and `http_access` targets stay machine-parseable. `RUST_LOG`
//! overrides the default filter in both modes.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is not set. The embedded database is
/// chatty at info level, so it is capped at warn.
const DEFAULT_FILTER: &str = "info,surrealdb=warn,surrealdb_core=warn";

fn filter(default_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match default_level {
            Some(level) => level,
            None => DEFAULT_FILTER,
        })
    })
}

/// Console logger for development runs
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, writing JSON files when a log directory is given
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "ems-server");
            tracing_subscriber::fmt()
                .with_env_filter(filter(log_level))
                .with_writer(file_appender)
                .with_ansi(false)
                .json()
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
