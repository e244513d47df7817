//! Error types for the chordclean library

use std::io;

/// Library error type for chordclean operations.
///
/// Cleaning itself never fails; only building a pipeline from a bad
/// configuration does.
#[derive(Debug, thiserror::Error)]
pub enum CleanerError {
    /// Invalid pipeline configuration
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for CleanerError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}

impl From<regex::Error> for CleanerError {
    fn from(error: regex::Error) -> Self {
        Self::ConfigError(format!("could not compile pattern {error}"))
    }
}
