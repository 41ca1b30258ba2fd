//! Error types for the logger system

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Minimum level text that does not name a severity
    #[error("Invalid log level: '{value}'")]
    InvalidSeverity { value: String },

    /// Resolved log file path is an existing directory
    #[error("Can't use directory as log file name: '{}'", path.display())]
    InvalidLogTarget { path: PathBuf },

    /// Opening a sink failed
    #[error("Failed to open log sink '{path}': {source}")]
    SinkConstruction {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid severity error for unparseable level text
    pub fn invalid_severity(value: impl Into<String>) -> Self {
        LoggerError::InvalidSeverity {
            value: value.into(),
        }
    }

    /// Create an invalid log target error
    pub fn invalid_log_target(path: impl Into<PathBuf>) -> Self {
        LoggerError::InvalidLogTarget { path: path.into() }
    }

    /// Create a sink construction error
    pub fn sink_construction(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkConstruction {
            path: path.into(),
            source,
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_severity("loud");
        assert!(matches!(err, LoggerError::InvalidSeverity { .. }));

        let err = LoggerError::config("Sampling", "tick must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::invalid_log_target("/var/log");
        assert!(matches!(err, LoggerError::InvalidLogTarget { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_severity("loud");
        assert_eq!(err.to_string(), "Invalid log level: 'loud'");

        let err = LoggerError::invalid_log_target("/var/log");
        assert_eq!(
            err.to_string(),
            "Can't use directory as log file name: '/var/log'"
        );

        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );
    }

    #[test]
    fn test_sink_construction_error_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::sink_construction("/var/log/app.INFO.log", io_err);

        assert!(err.to_string().contains("/var/log/app.INFO.log"));
        assert!(err.source().is_some());
    }
}
