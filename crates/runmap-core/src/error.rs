//! Error types for runmap-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// runmap-core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Pixel buffer length does not match the image size
    #[error("data length {actual} doesn't match image size {size:?} ({expected} pixels)")]
    DataLength {
        size: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Index outside the image's largest region
    #[error("index {index:?} outside region starting at {start:?} with size {size:?}")]
    IndexOutOfBounds {
        index: Vec<i64>,
        start: Vec<i64>,
        size: Vec<usize>,
    },

    /// Invalid physical metadata (spacing, origin)
    #[error("invalid image metadata: {0}")]
    InvalidMetadata(String),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for runmap-core operations
pub type Result<T> = std::result::Result<T, Error>;
