//! Error types for chain operations.

use thiserror::Error;

use chainpost_core::{CoreError, RecordPointer};
use chainpost_medium::MediumError;

/// Errors that can occur while driving a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The medium failed; propagated as-is, never retried.
    #[error("medium unavailable: {0}")]
    Medium(#[from] MediumError),

    /// A record header could not be parsed while walking the chain.
    /// Fatal: there is no self-repair.
    #[error("corrupt chain at {pointer}: {reason}")]
    CorruptChain {
        pointer: RecordPointer,
        reason: String,
    },

    /// The encoded payload violates a size ceiling. Detected before any
    /// medium call, so the failed operation had no side effects.
    #[error("payload too large: {0}")]
    PayloadTooLarge(CoreError),

    /// A type tag with no registered codec. Directory decoding downgrades
    /// this to a warn-and-skip; explicit registry lookups surface it.
    #[error("unknown payload type tag: {0:?}")]
    UnknownType(String),

    /// The chain was read or written before `init` or `load`.
    #[error("chain has not been initialized or loaded")]
    EmptyChain,

    /// A codec failed to encode or decode a payload.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
