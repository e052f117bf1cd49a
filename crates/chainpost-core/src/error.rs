//! Error types for the core primitives.

use thiserror::Error;

/// Errors raised by the wire format, the packing planner, and codecs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The first line of a record body is not two decimal integers.
    #[error("malformed chain header: {0:?}")]
    MalformedHeader(String),

    /// A single payload line exceeds the per-line ceiling.
    #[error("payload line is {units} units, limit is {limit}")]
    LineTooLong { units: usize, limit: usize },

    /// A composed record body exceeds the per-record ceiling.
    #[error("record body is {units} units, limit is {limit}")]
    BodyTooLarge { units: usize, limit: usize },

    /// A codec could not reassemble a value from payload lines.
    #[error("decode error: {0}")]
    Decode(String),

    /// A codec could not serialize a value into payload lines.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
