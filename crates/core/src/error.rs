//! Error handling with context and recovery suggestions
//!
//! This module provides structured error types with:
//! - Detailed error context
//! - Recovery suggestions
//! - Error codes for programmatic handling
//! - Serializable error reports

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,
    StorageFull = 2005,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Process errors (5xxx)
    ProcessError = 5000,

    // Validation errors (6xxx)
    ValidationError = 6000,

    // Platform-specific errors (8xxx)
    GradleError = 8002,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            5 => "Process",
            6 => "Validation",
            8 => "Platform",
            _ => "Unknown",
        }
    }

    /// Exit code a CLI should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            6 => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .weightcalc.toml file or use --config to specify a path")
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    pub fn gradle(task: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GradleError, message)
            .with_context(format!("While running Gradle task {}", task))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// Serializable error report for logging and machine-readable output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            std::io::ErrorKind::StorageFull => ErrorCode::StorageFull,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::new(ErrorCode::ConfigError, format!("TOML serialize error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::GradleError.to_string(), "E8002");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigValidationError.category(), "Configuration");
        assert_eq!(ErrorCode::GradleError.category(), "Platform");
    }

    #[test]
    fn test_error_code_exit_code() {
        assert_eq!(ErrorCode::PermissionDenied.exit_code(), exit_codes::FAILURE);
        assert_eq!(ErrorCode::ConfigParseError.exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(ErrorCode::ValidationError.exit_code(), exit_codes::VALIDATION_ERROR);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/file")
            .with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_result_ext_context_on_io_result() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk on fire"));
        let err = res.context("Copying artifact").unwrap_err();
        assert_eq!(err.code, ErrorCode::IoError);
        assert_eq!(err.context.as_deref(), Some("Copying artifact"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::gradle("assembleRelease", "Gradle exited with code 1");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E8002"));
        assert!(json.contains("Platform"));
        assert!(json.contains("assembleRelease"));
    }
}
