//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by the analysis views before any traversal starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Unknown metric '{0}'")]
    InvalidMetric(String),
}

/// Errors that can occur while parsing a raw profile
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid profile format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during file input/output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to parse profile: {0}")]
    Parse(#[from] ParseError),
}
