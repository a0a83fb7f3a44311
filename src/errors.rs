//! Error types for whichprovides.
//!
//! None of these errors reach callers of [`Resolver::resolve`](crate::Resolver::resolve):
//! the resolver absorbs every probe failure and falls through to the next probe.
//! They surface from configuration loading and from the lower-level building
//! blocks ([`CommandRunner`](crate::runner::CommandRunner), the probes) when used directly.

use thiserror::Error;

/// The main error type for whichprovides operations.
#[derive(Debug, Error)]
pub enum ProvidesError {
    /// Configuration loading or deserialization errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// File I/O operation failures
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// A package manager could not be executed
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// A package manager succeeded but its output did not have the expected shape
    #[error("Unexpected output from {tool}: {details}")]
    MalformedOutput { tool: String, details: String },
}

/// A type alias for Results that use ProvidesError.
pub type Result<T> = std::result::Result<T, ProvidesError>;

impl ProvidesError {
    /// Creates a new CommandFailed error with context.
    pub fn command_failed<S1, S2>(cmd: S1, details: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        ProvidesError::CommandFailed(format!("{}: {}", cmd.into(), details.into()))
    }

    /// Creates a new MalformedOutput error.
    pub fn malformed_output<S1, S2>(tool: S1, details: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        ProvidesError::MalformedOutput {
            tool: tool.into(),
            details: details.into(),
        }
    }

    /// Returns the error category as a string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            ProvidesError::Config(_) => "config",
            ProvidesError::Io(_) => "io",
            ProvidesError::CommandFailed(_) => "command_failed",
            ProvidesError::MalformedOutput { .. } => "malformed_output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = ProvidesError::command_failed("dpkg -S /bin/bash", "No such file or directory");
        let error_string = format!("{}", err);
        assert!(error_string.contains("dpkg -S /bin/bash"));
        assert!(error_string.contains("No such file or directory"));
        assert_eq!(err.category(), "command_failed");
    }

    #[test]
    fn test_malformed_output_display() {
        let err = ProvidesError::malformed_output("rpm", "expected at least 3 fields");
        assert_eq!(
            err.to_string(),
            "Unexpected output from rpm: expected at least 3 fields"
        );
        assert_eq!(err.category(), "malformed_output");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ProvidesError = io.into();
        assert_eq!(err.category(), "io");
    }
}
