//! Error types for the medium adapter.

use thiserror::Error;

/// Errors that can occur during medium operations.
#[derive(Debug, Error)]
pub enum MediumError {
    /// Network or platform failure; the call may or may not have taken
    /// effect on the remote side.
    #[error("medium unavailable: {0}")]
    Unavailable(String),

    /// The medium refused the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The container id does not resolve.
    #[error("container {0} not found")]
    ContainerNotFound(u64),

    /// The record id does not exist in its container.
    #[error("record {record_id} not found in container {container_id}")]
    RecordNotFound { container_id: u64, record_id: u64 },

    /// The body exceeds what the medium accepts per record.
    #[error("record body is {units} units, medium limit is {limit}")]
    BodyTooLarge { units: usize, limit: usize },
}

/// Result type for medium operations.
pub type Result<T> = std::result::Result<T, MediumError>;
