//! # Chainpost Engine
//!
//! The chain engine: generic lifecycle (init, load, read, append, rewrite)
//! for a singly linked chain of records over any [`RecordMedium`], decoded
//! and encoded through any [`Codec`].
//!
//! ## Key Types
//!
//! - [`Codec`] - the decode/encode contract a payload type implements
//! - [`ChainEngine`] - drives one chain through a medium and a codec
//! - [`ChainStore`] - object-safe erased view of an engine, for directories
//! - [`DirectoryCodec`] / [`Directory`] - a payload type composing named,
//!   heterogeneously typed sub-chains
//! - [`CodecRegistry`] - maps type tags to store constructors
//! - [`ChainError`] - errors for all chain operations
//!
//! ## Design Notes
//!
//! - **Stable heads**: appends and rewrites edit the existing tail record in
//!   place and only create new records after it, so the head pointer handed
//!   out to callers never changes identity.
//! - **Pre-mutation validation**: an oversize payload fails before the first
//!   medium call; a failed append is a no-op.
//! - **Single writer per engine**: append/rewrite serialize on a per-engine
//!   lock; concurrent writers would otherwise lose updates.
//! - **No retries**: medium failures propagate as [`ChainError::Medium`].

pub mod codec;
pub mod directory;
pub mod engine;
pub mod error;
pub mod registry;
pub mod store;

pub use codec::Codec;
pub use directory::{entry_as, Directory, DirectoryCodec, DIRECTORY_TAG};
pub use engine::ChainEngine;
pub use error::{ChainError, Result};
pub use registry::CodecRegistry;
pub use store::ChainStore;

pub use chainpost_core::{CoreError, RecordPointer};
pub use chainpost_medium::{MediumError, RecordMedium};
