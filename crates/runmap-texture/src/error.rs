//! Error types for runmap-texture
//!
//! Configuration problems are reported by the setters that detect them;
//! the remaining variants surface from a computation.

use thiserror::Error;

/// Errors that can occur during run-length texture operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TextureError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] runmap_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The offset set holds no offset
    #[error("offset set must not be empty")]
    EmptyOffsets,

    /// An offset with every component zero
    #[error("offset {0:?} is the zero vector")]
    ZeroOffset(Vec<i64>),

    /// Feature identifier outside the catalogue
    #[error("unknown run-length feature: {0}")]
    UnknownFeature(String),

    /// A required input was never set
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// The mask does not share the input grid. `what` names the first
    /// differing property: "region", "spacing" or "origin".
    #[error("mask {what} doesn't match input (mask size {mask:?}, input size {input:?})")]
    MaskMismatch {
        what: &'static str,
        input: Vec<usize>,
        mask: Vec<usize>,
    },

    /// A run-length matrix without any run
    #[error("run-length matrix holds no run")]
    EmptyMatrix,

    /// A window produced no run (strict mode only)
    #[error("window centred at {index:?} holds no valid run")]
    EmptyWindow { index: Vec<i64> },

    /// The computation was cancelled by the caller
    #[error("cancelled after {completed_lines} lines")]
    Cancelled { completed_lines: usize },
}

/// Result type for texture operations
pub type TextureResult<T> = Result<T, TextureError>;
