//! Root bootstrap: the one durable pointer a deployment keeps.
//!
//! Everything else - every named store, every nested directory - is
//! reachable by pointer-following from the root directory chain. The root
//! head is the only pointer that must be persisted outside the medium.

use std::sync::Arc;

use tracing::debug;

use chainpost_codecs::{JsonCodec, PackedTextCodec, PixelCodec, StringCodec};
use chainpost_engine::{
    ChainEngine, CodecRegistry, Directory, DirectoryCodec, RecordMedium, RecordPointer, Result,
};

/// Registry with every codec this workspace ships, under its wire tag.
///
/// Directory chains are not registered; the directory codec constructs
/// nested directory stores itself.
pub fn standard_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    registry.register("string", |medium| {
        Arc::new(ChainEngine::new(medium, StringCodec))
    });
    registry.register("json", |medium| {
        Arc::new(ChainEngine::new(medium, JsonCodec))
    });
    registry.register("pixel", |medium| {
        Arc::new(ChainEngine::new(medium, PixelCodec))
    });
    registry.register("base2048", |medium| {
        Arc::new(ChainEngine::new(medium, PackedTextCodec))
    });
    registry
}

/// The root directory chain of a deployment.
///
/// Opening with a pointer resumes an existing deployment; opening without
/// one initializes a fresh root chain and the caller must persist
/// [`head`](Self::head) externally, or the data is unreachable.
pub struct RootStore {
    engine: ChainEngine<DirectoryCodec>,
    head: RecordPointer,
}

impl RootStore {
    /// Open the root: load from `head` when given, otherwise initialize a
    /// fresh root chain in `container_id`.
    pub async fn open(
        medium: Arc<dyn RecordMedium>,
        registry: Arc<CodecRegistry>,
        container_id: u64,
        head: Option<RecordPointer>,
    ) -> Result<Self> {
        let codec = DirectoryCodec::new(medium.clone(), registry);
        let engine = ChainEngine::new(medium, codec);
        let head = match head {
            Some(head) => engine.load(head).await?,
            None => engine.init(container_id).await?,
        };
        debug!(%head, "root opened");
        Ok(Self { engine, head })
    }

    /// The durable handle to this deployment.
    pub fn head(&self) -> RecordPointer {
        self.head
    }

    /// The engine driving the root directory chain.
    pub fn engine(&self) -> &ChainEngine<DirectoryCodec> {
        &self.engine
    }

    /// Read the root directory, loading every entry's sub-chain.
    pub async fn directory(&self) -> Result<Directory> {
        self.engine.read_all().await
    }

    /// Persist the root directory, replacing its previous contents.
    ///
    /// The head record keeps its identity, so the externally persisted
    /// pointer stays valid across saves.
    pub async fn save(&self, directory: &Directory) -> Result<()> {
        self.engine.rewrite_all(directory).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainpost_medium::MemoryMedium;

    #[tokio::test]
    async fn test_standard_registry_tags() {
        let registry = standard_registry();
        let tags: Vec<&str> = registry.tags().collect();
        assert_eq!(tags, vec!["base2048", "json", "pixel", "string"]);
    }

    #[tokio::test]
    async fn test_fresh_root_is_empty() {
        let medium = Arc::new(MemoryMedium::with_containers(&[7]));
        let root = RootStore::open(
            medium as Arc<dyn RecordMedium>,
            Arc::new(standard_registry()),
            7,
            None,
        )
        .await
        .unwrap();

        assert_eq!(root.head().container_id, 7);
        assert!(root.directory().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reopen_keeps_head() {
        let medium = Arc::new(MemoryMedium::with_containers(&[7]));
        let registry = Arc::new(standard_registry());

        let first = RootStore::open(
            medium.clone() as Arc<dyn RecordMedium>,
            registry.clone(),
            7,
            None,
        )
        .await
        .unwrap();
        let head = first.head();

        let second = RootStore::open(
            medium as Arc<dyn RecordMedium>,
            registry,
            7,
            Some(head),
        )
        .await
        .unwrap();
        assert_eq!(second.head(), head);
    }
}
