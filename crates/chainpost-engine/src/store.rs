//! Type-erased view of a chain engine.
//!
//! Directory storage holds sub-stores of heterogeneous payload types behind
//! this object-safe trait. Typed access goes through [`ChainStore::as_any`]
//! and downcasting to the concrete `ChainEngine<C>`.

use std::any::Any;

use async_trait::async_trait;

use chainpost_core::RecordPointer;

use crate::error::Result;

/// Object-safe surface of an engine, as directory entries see it.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// The registry tag selecting this store's codec.
    fn type_tag(&self) -> &'static str;

    /// Snapshot of the resolved chain, head first.
    async fn chain(&self) -> Vec<RecordPointer>;

    /// Head pointer, if the chain has been initialized or loaded.
    async fn head(&self) -> Option<RecordPointer>;

    /// Create the chain in the given container.
    async fn init(&self, container_id: u64) -> Result<RecordPointer>;

    /// Rebuild the chain by walking headers from `head`.
    async fn load(&self, head: RecordPointer) -> Result<RecordPointer>;

    /// Downcast hook for typed access.
    fn as_any(&self) -> &dyn Any;
}
