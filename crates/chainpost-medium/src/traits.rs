//! The medium trait: the abstract interface the chain engine drives.
//!
//! Implementations wrap whatever platform actually holds the records. The
//! in-memory implementation lives in [`crate::memory`] for tests.

use async_trait::async_trait;

use chainpost_core::RecordPointer;

use crate::error::Result;

/// Opaque proof that a container was resolved.
///
/// A handle is only meaningful to the medium that issued it. Engines cache
/// handles per instance so each container is resolved at most once per
/// engine; the cache is never shared across engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    container_id: u64,
}

impl ContainerHandle {
    /// Create a handle for a resolved container.
    pub fn new(container_id: u64) -> Self {
        Self { container_id }
    }

    /// The container this handle resolves.
    pub fn container_id(&self) -> u64 {
        self.container_id
    }
}

/// Async adapter over the size-limited messaging medium.
///
/// Every call is an independent suspension point, fallible, and unordered
/// with respect to the others. Errors are propagated, never retried here:
/// read calls are safely retriable by the caller, `create_record` is not.
#[async_trait]
pub trait RecordMedium: Send + Sync {
    /// Resolve a container id into a handle usable by the other calls.
    async fn resolve_container(&self, container_id: u64) -> Result<ContainerHandle>;

    /// Create a new record with the given body, returning its pointer.
    async fn create_record(&self, container: &ContainerHandle, body: &str)
        -> Result<RecordPointer>;

    /// Fetch the body of an existing record.
    async fn fetch_record(&self, container: &ContainerHandle, record_id: u64) -> Result<String>;

    /// Replace the body of an existing record in place.
    ///
    /// Only valid for records this side created last; the commit step of an
    /// append relies on it.
    async fn edit_record(
        &self,
        container: &ContainerHandle,
        record_id: u64,
        body: &str,
    ) -> Result<()>;
}
