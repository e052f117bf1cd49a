//! Directory storage: a chain payload composing named, typed sub-chains.
//!
//! A directory line is `"{name} {container_id} {record_id} {type_tag}"`.
//! Encoding writes one line per chain element per entry - the full chain is
//! persisted redundantly for storage compatibility - while decoding only
//! consumes the first line per name and re-derives the rest by
//! pointer-following.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::warn;

use chainpost_core::{CoreError, RecordPointer};
use chainpost_medium::RecordMedium;

use crate::codec::Codec;
use crate::engine::ChainEngine;
use crate::error::Result;
use crate::registry::CodecRegistry;
use crate::store::ChainStore;

/// Type tag for directory chains.
///
/// Handled by the directory codec itself rather than the registry, so
/// directories can nest without the registry referencing itself.
pub const DIRECTORY_TAG: &str = "directory";

/// Named, heterogeneously typed sub-stores.
///
/// Iteration - and therefore serialization - order is name order.
pub type Directory = BTreeMap<String, Arc<dyn ChainStore>>;

/// Downcast a directory entry to its concrete engine type.
pub fn entry_as<'a, C>(directory: &'a Directory, name: &str) -> Option<&'a ChainEngine<C>>
where
    C: Codec + 'static,
{
    directory.get(name)?.as_any().downcast_ref::<ChainEngine<C>>()
}

/// Codec for directory chains.
///
/// Decoding builds a live store per entry and loads all of their chains
/// concurrently before returning. An unknown type tag skips that entry with
/// a warning; a failed sub-chain load fails the whole decode.
pub struct DirectoryCodec {
    medium: Arc<dyn RecordMedium>,
    registry: Arc<CodecRegistry>,
}

impl DirectoryCodec {
    /// Create a directory codec over a medium and a tag registry.
    pub fn new(medium: Arc<dyn RecordMedium>, registry: Arc<CodecRegistry>) -> Self {
        Self { medium, registry }
    }

    /// A fresh, unloaded engine for a nested directory chain.
    pub fn nested_engine(&self) -> ChainEngine<DirectoryCodec> {
        ChainEngine::new(
            self.medium.clone(),
            DirectoryCodec::new(self.medium.clone(), self.registry.clone()),
        )
    }

    fn parse_line(line: &str) -> Result<(String, RecordPointer, String)> {
        let bad = || CoreError::Decode(format!("bad directory line: {line:?}"));
        let mut parts = line.split_whitespace();
        let (Some(name), Some(container), Some(record), Some(tag), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(bad().into());
        };
        let container_id: u64 = container.parse().map_err(|_| bad())?;
        let record_id: u64 = record.parse().map_err(|_| bad())?;
        Ok((
            name.to_string(),
            RecordPointer::new(container_id, record_id),
            tag.to_string(),
        ))
    }
}

#[async_trait]
impl Codec for DirectoryCodec {
    type Value = Directory;

    fn tag(&self) -> &'static str {
        DIRECTORY_TAG
    }

    async fn decode(&self, lines: Vec<String>) -> Result<Directory> {
        let mut directory = Directory::new();
        let mut pending: Vec<(Arc<dyn ChainStore>, RecordPointer)> = Vec::new();
        // First line per name wins; later lines are the redundant tail
        // pointers written by encode.
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for line in &lines {
            let (name, head, tag) = Self::parse_line(line)?;
            if !seen.insert(name.clone()) {
                continue;
            }

            let store: Arc<dyn ChainStore> = if tag == DIRECTORY_TAG {
                Arc::new(self.nested_engine())
            } else {
                match self.registry.make(&tag, self.medium.clone()) {
                    Some(store) => store,
                    None => {
                        warn!(name = %name, tag = %tag, "unknown payload type, skipping entry");
                        continue;
                    }
                }
            };
            pending.push((store.clone(), head));
            directory.insert(name, store);
        }

        // Fan out the sub-chain loads; completion order is irrelevant since
        // each store reattaches its own result.
        try_join_all(pending.iter().map(|(store, head)| store.load(*head))).await?;

        Ok(directory)
    }

    async fn encode(&self, directory: &Directory) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for (name, store) in directory {
            let tag = store.type_tag();
            for ptr in store.chain().await {
                lines.push(format!(
                    "{name} {} {} {tag}",
                    ptr.container_id, ptr.record_id
                ));
            }
        }
        Ok(lines)
    }
}
