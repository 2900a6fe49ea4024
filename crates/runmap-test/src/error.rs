//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression test inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error while building an image
    #[error("core error: {0}")]
    Core(#[from] runmap_core::Error),

    /// Invalid generator arguments
    #[error("invalid generator '{name}': {message}")]
    Generator { name: &'static str, message: String },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
