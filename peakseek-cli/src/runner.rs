//! CLI runner for common setup.
//!
//! Encapsulates logging initialization so command handlers share one
//! startup path. The runner must outlive the command: dropping it flushes
//! the log writer.

use tracing::info;

use peakseek::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard, keeps logging active while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
}

impl CliRunner {
    /// Create a new CLI runner, initializing logging.
    pub fn new() -> Result<Self, CliError> {
        let logging_guard = init_logging(default_log_dir(), default_log_file())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self { logging_guard })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Peakseek v{}", peakseek::VERSION);
        info!("Peakseek CLI: {} command", command);
    }
}
