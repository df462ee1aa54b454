//! Error types for the meshsnap library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for snapshot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid frame-selection or export configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A token that must be an integer could not be parsed as one
    #[error("Cannot translate {token:?} to an integer ({context})")]
    ValueTranslation { token: String, context: String },

    /// Array dimensions disagree between artifacts or frames
    #[error("Shape mismatch: expected {expected}, got {actual} ({context})")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Decode-time topology mode does not match the mode the data was stored with
    #[error("Topology mode mismatch: data is stored as {stored}, requested as {requested}")]
    TopologyIncompatible { stored: String, requested: String },

    /// Requested frame number is outside the captured range
    #[error("Frame {frame} out of range (valid: 1..={count})")]
    FrameOutOfRange { frame: i32, count: usize },

    /// Invalid magic bytes at start of an artifact
    #[error("Invalid snapshot artifact: bad magic bytes")]
    InvalidMagic,

    /// Unsupported artifact format version
    #[error("Unsupported snapshot format version: {0}")]
    UnsupportedVersion(u16),

    /// Artifact is truncated or corrupted
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in an artifact
    #[error("Invalid artifact structure: {0}")]
    InvalidStructure(String),

    /// Metadata sidecar is missing fields or not valid JSON
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::InvalidMagic;
        assert!(e.to_string().contains("magic"));

        let e = Error::ShapeMismatch {
            expected: 10,
            actual: 7,
            context: "frame count".into(),
        };
        assert!(e.to_string().contains("10"));
        assert!(e.to_string().contains("7"));

        let e = Error::FrameOutOfRange { frame: 12, count: 5 };
        assert!(e.to_string().contains("12"));
        assert!(e.to_string().contains("1..=5"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
