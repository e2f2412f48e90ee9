//! Error types for activity-elt
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for activity-elt
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid record count {count}: must be a positive integer")]
    InvalidCount { count: usize },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generation Errors
    // ============================================================================
    #[error("Sink write failed after {records_written} records: {source}")]
    Sink {
        records_written: usize,
        #[source]
        source: std::io::Error,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Validation failed: {reason}")]
    Validation {
        invalid: usize,
        total: usize,
        reason: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Wrap a sink failure, recording how many whole lines were written first
    pub fn sink(records_written: usize, source: std::io::Error) -> Self {
        Self::Sink {
            records_written,
            source,
        }
    }

    /// Check if this error is a configuration problem (raised before any output)
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::InvalidCount { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
        )
    }
}

/// Result type alias for activity-elt
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::InvalidCount { count: 0 };
        assert_eq!(
            err.to_string(),
            "Invalid record count 0: must be a positive integer"
        );

        let err = Error::Validation {
            invalid: 0,
            total: 10,
            reason: "1 duplicate event_id values".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: 1 duplicate event_id values"
        );
    }

    #[test]
    fn test_sink_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::sink(7, io);
        assert!(err.to_string().contains("after 7 records"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_config() {
        assert!(Error::InvalidCount { count: 0 }.is_config());
        assert!(Error::config("bad").is_config());
        assert!(Error::invalid_value("count", "zero").is_config());

        assert!(!Error::output("upload").is_config());
        assert!(!Error::Io(std::io::Error::other("disk")).is_config());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
