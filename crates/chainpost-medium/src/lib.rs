//! # Chainpost Medium
//!
//! The record medium adapter: the async, fallible surface the chain engine
//! drives. A medium is any size-limited store of addressable text records
//! grouped into containers - a messaging platform, in the original setting.
//!
//! ## Key Types
//!
//! - [`RecordMedium`] - the async trait for all medium operations
//! - [`ContainerHandle`] - opaque proof that a container was resolved
//! - [`MemoryMedium`] - in-memory medium for tests, with call counters
//! - [`MediumError`] - errors surfaced by medium calls
//!
//! The medium gives no ordering guarantee across calls and nothing here
//! retries; failures propagate to the engine as-is.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{MediumError, Result};
pub use memory::{MemoryMedium, MediumStats};
pub use traits::{ContainerHandle, RecordMedium};
