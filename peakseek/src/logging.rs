//! Logging infrastructure.
//!
//! Structured tracing output for the search stack:
//! - Writes to `logs/peakseek.log`, truncated at session start
//! - Mirrors everything to stdout for interactive runs
//! - Filter configurable via `RUST_LOG`, defaulting to `info`
//!
//! Search outcome detail lives only in these logs; the goal surface
//! reports a bare terminal state.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initializes the global tracing subscriber.
///
/// Creates the log directory if needed, truncates the previous session's
/// file, and installs dual file/stdout output.
///
/// # Arguments
///
/// * `log_dir` - Directory for log files (e.g. "logs")
/// * `log_file` - Log filename (e.g. "peakseek.log")
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the previous
/// log file cannot be truncated.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Truncate rather than append: one file per session.
    let log_path = Path::new(log_dir).join(log_file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    // Local wall-clock timestamps; log files are read next to the robot.
    let timer = LocalTime::rfc_3339();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_timer(timer.clone());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_timer(timer);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "peakseek.log"
}
