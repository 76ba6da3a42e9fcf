//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the async runtime
    Runtime(String),
    /// Invalid command-line input
    Config(String),
    /// The search was cancelled before reaching a peak
    Cancelled,
    /// The search aborted on a collaborator failure
    Aborted,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Aborted = self {
            eprintln!();
            eprintln!("Check the log file for the failing collaborator.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to start async runtime: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Cancelled => write!(f, "Search cancelled before reaching a peak"),
            CliError::Aborted => write!(f, "Search aborted"),
        }
    }
}

impl std::error::Error for CliError {}
