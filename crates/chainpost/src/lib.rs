//! # Chainpost
//!
//! Durable typed stores on a size-limited messaging medium. Data lives in
//! singly linked chains of fixed-capacity text records; a directory chain
//! maps names to typed sub-chains, and one root pointer makes the whole
//! deployment reachable.
//!
//! This crate is the facade: it re-exports the workspace and adds the root
//! bootstrap ([`RootStore`], [`standard_registry`]).
//!
//! ## Layout
//!
//! - [`chainpost_core`] - pointers, wire format, pure packing planner
//! - [`chainpost_medium`] - the async medium adapter trait
//! - [`chainpost_engine`] - the chain engine, directories, the registry
//! - [`chainpost_codecs`] - leaf payload codecs
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chainpost::{
//!     entry_as, standard_registry, ChainStore, Directory, MemoryMedium, RecordMedium,
//!     RootStore, StringCodec,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> chainpost::Result<()> {
//! let medium: Arc<dyn RecordMedium> = Arc::new(MemoryMedium::with_containers(&[1]));
//! let registry = Arc::new(standard_registry());
//!
//! // Fresh deployment: initialize a root and keep its head somewhere safe.
//! let root = RootStore::open(medium.clone(), registry.clone(), 1, None).await?;
//! let head = root.head();
//!
//! // Add a typed store under a name and persist the directory.
//! let notes = registry.make_required("string", medium.clone())?;
//! notes.init(1).await?;
//! let mut directory = Directory::new();
//! directory.insert("notes".to_string(), notes);
//! root.save(&directory).await?;
//!
//! // Write through the typed view.
//! let directory = root.directory().await?;
//! let notes = entry_as::<StringCodec>(&directory, "notes").unwrap();
//! notes.append(&"hello".to_string(), true).await?;
//! assert_eq!(notes.read_all().await?, "hello");
//!
//! // A later process resumes from the head pointer alone.
//! let resumed = RootStore::open(medium, registry, 1, Some(head)).await?;
//! assert!(resumed.directory().await?.contains_key("notes"));
//! # Ok(())
//! # }
//! ```

pub mod root;

pub use root::{standard_registry, RootStore};

pub use chainpost_codecs::{JsonCodec, PackedTextCodec, Pixel, PixelCodec, StringCodec};
pub use chainpost_core::{units, CoreError, RecordPointer, MAX_LINE_UNITS, MAX_RECORD_UNITS};
pub use chainpost_engine::{
    entry_as, ChainEngine, ChainError, ChainStore, Codec, CodecRegistry, Directory,
    DirectoryCodec, Result, DIRECTORY_TAG,
};
pub use chainpost_medium::{ContainerHandle, MediumError, MemoryMedium, RecordMedium};
