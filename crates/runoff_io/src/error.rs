//! Error types for runoff_io.
//!
//! Every save/load path reports through [`IoError`].

use thiserror::Error;

/// Main error type for runoff_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rkyv-specific errors
    #[error("Rkyv error: {0}")]
    Rkyv(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// Compression errors
    #[error("Compression error: {0}")]
    Compression(String),

    /// Snapshot contents inconsistent with its own dimensions
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for runoff_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn rkyv<S: Into<String>>(msg: S) -> Self {
        Self::Rkyv(msg.into())
    }

    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::serialization("bad bytes");
        assert_eq!(err.to_string(), "Serialization error: bad bytes");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::validation("3 counts for 4 tiles").with_context("loading save.json");
        let text = err.to_string();
        assert!(text.contains("loading save.json"));
        assert!(text.contains("3 counts for 4 tiles"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IoError = io_err.into();
        assert!(matches!(err, IoError::FileSystem(_)));
    }
}
