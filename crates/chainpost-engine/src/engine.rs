//! The chain engine: lifecycle of one linked chain of records.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use chainpost_core::{pack, wire, RecordPointer};
use chainpost_medium::{ContainerHandle, RecordMedium};

use crate::codec::Codec;
use crate::error::{ChainError, Result};
use crate::store::ChainStore;

/// Drives one chain of linked records over a medium, through a codec.
///
/// All methods take `&self`: the chain and the container-handle cache live
/// behind `tokio::sync` locks so an engine can be shared via `Arc`. Appends
/// and rewrites additionally serialize on a per-engine write lock - they
/// read-then-decide-then-mutate, and two interleaved writers would corrupt
/// the chain with lost updates or duplicate tail edits.
pub struct ChainEngine<C> {
    medium: Arc<dyn RecordMedium>,
    codec: C,
    /// Resolved chain, head first. Empty until `init` or `load`.
    chain: RwLock<Vec<RecordPointer>>,
    /// Per-engine container cache; each container is resolved at most once.
    containers: RwLock<HashMap<u64, ContainerHandle>>,
    write_lock: Mutex<()>,
}

impl<C: Codec> ChainEngine<C> {
    /// Create an engine with no chain attached yet.
    pub fn new(medium: Arc<dyn RecordMedium>, codec: C) -> Self {
        Self {
            medium,
            codec,
            chain: RwLock::new(Vec::new()),
            containers: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// The codec this engine decodes and encodes through.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Snapshot of the resolved chain, head first.
    pub async fn chain(&self) -> Vec<RecordPointer> {
        self.chain.read().await.clone()
    }

    /// Head pointer, if the chain has been initialized or loaded.
    pub async fn head(&self) -> Option<RecordPointer> {
        self.chain.read().await.first().copied()
    }

    /// Resolve a container, consulting the per-engine cache first.
    async fn container(&self, container_id: u64) -> Result<ContainerHandle> {
        if let Some(handle) = self.containers.read().await.get(&container_id) {
            return Ok(handle.clone());
        }
        let handle = self.medium.resolve_container(container_id).await?;
        self.containers
            .write()
            .await
            .insert(container_id, handle.clone());
        Ok(handle)
    }

    /// Create the chain: a single terminal record with no payload.
    ///
    /// The returned pointer is the chain's durable handle.
    pub async fn init(&self, container_id: u64) -> Result<RecordPointer> {
        let _guard = self.write_lock.lock().await;
        let handle = self.container(container_id).await?;
        let body = wire::format_header(RecordPointer::TERMINAL);
        let head = self.medium.create_record(&handle, &body).await?;
        let mut chain = self.chain.write().await;
        chain.clear();
        chain.push(head);
        Ok(head)
    }

    /// Rebuild the in-memory chain by following headers from `head`.
    ///
    /// Each visited body's first line names the next record; the terminal
    /// sentinel ends the walk. Container handles are cached as the walk
    /// crosses containers. No retries: a fetch failure surfaces as
    /// [`ChainError::Medium`], an unparsable header as
    /// [`ChainError::CorruptChain`].
    pub async fn load(&self, head: RecordPointer) -> Result<RecordPointer> {
        let _guard = self.write_lock.lock().await;
        let mut resolved = vec![head];
        let mut cursor = head;
        loop {
            let handle = self.container(cursor.container_id).await?;
            let body = self.medium.fetch_record(&handle, cursor.record_id).await?;
            let next = wire::parse_header(&body).map_err(|e| ChainError::CorruptChain {
                pointer: cursor,
                reason: e.to_string(),
            })?;
            if next.is_terminal() {
                break;
            }
            resolved.push(next);
            cursor = next;
        }
        debug!(records = resolved.len(), "chain loaded");
        *self.chain.write().await = resolved;
        Ok(head)
    }

    /// Fetch one record's payload lines, header stripped.
    async fn fetch_payload(&self, ptr: RecordPointer) -> Result<Vec<String>> {
        let handle = self.container(ptr.container_id).await?;
        let body = self.medium.fetch_record(&handle, ptr.record_id).await?;
        Ok(wire::payload_lines(&body).map(str::to_owned).collect())
    }

    /// Decode the payload of the record at `index` in the chain.
    ///
    /// Fails [`ChainError::EmptyChain`] when nothing is resolved at that
    /// position (chain not loaded, or index past the tail).
    pub async fn read(&self, index: usize) -> Result<C::Value> {
        let ptr = {
            let chain = self.chain.read().await;
            *chain.get(index).ok_or(ChainError::EmptyChain)?
        };
        let lines = self.fetch_payload(ptr).await?;
        self.codec.decode(lines).await
    }

    /// Fetch every record concurrently and decode the flattened payload.
    ///
    /// Fetches fan out in any order; bodies are reassembled in strict chain
    /// order before the single decode. All-or-nothing: any fetch failure
    /// aborts with no partial result.
    pub async fn read_all(&self) -> Result<C::Value> {
        let chain = self.chain.read().await.clone();
        if chain.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        let per_record = try_join_all(chain.iter().map(|ptr| self.fetch_payload(*ptr))).await?;
        let lines: Vec<String> = per_record.into_iter().flatten().collect();
        self.codec.decode(lines).await
    }

    /// Append a value to the chain.
    ///
    /// With `reuse_tail_content`, the tail record's leftover payload is kept
    /// and new lines pack in after it; a rewrite passes `false` to start the
    /// tail fresh.
    ///
    /// Records are created in reverse chain order - the chain-order-last
    /// body first, with the terminal header, then each preceding body
    /// pointing at the record just created - and the pre-existing tail is
    /// edited last to link to the first new record. That final edit is the
    /// commit point: until it lands, the published chain is unchanged, and
    /// after it every previously handed-out pointer is still valid.
    pub async fn append(&self, value: &C::Value, reuse_tail_content: bool) -> Result<()> {
        let lines = self.codec.encode(value).await?;
        pack::check_lines(&lines).map_err(ChainError::PayloadTooLarge)?;
        let _guard = self.write_lock.lock().await;
        self.append_locked(lines, reuse_tail_content).await
    }

    /// Replace the chain contents, keeping the head record's identity.
    ///
    /// The in-memory chain is truncated to its head and rebuilt by a fresh
    /// append. Records linked by earlier appends become unreferenced
    /// orphans; nothing reclaims them.
    pub async fn rewrite_all(&self, value: &C::Value) -> Result<()> {
        let lines = self.codec.encode(value).await?;
        pack::check_lines(&lines).map_err(ChainError::PayloadTooLarge)?;
        let _guard = self.write_lock.lock().await;
        {
            let mut chain = self.chain.write().await;
            if chain.is_empty() {
                return Err(ChainError::EmptyChain);
            }
            chain.truncate(1);
        }
        self.append_locked(lines, false).await
    }

    /// Append body: caller holds the write lock and has validated `lines`.
    async fn append_locked(&self, lines: Vec<String>, reuse_tail_content: bool) -> Result<()> {
        let tail = {
            let chain = self.chain.read().await;
            *chain.last().ok_or(ChainError::EmptyChain)?
        };
        let handle = self.container(tail.container_id).await?;
        let tail_body = self.medium.fetch_record(&handle, tail.record_id).await?;

        let leftover: Vec<&str> = wire::payload_lines(&tail_body).collect();
        let carry = if reuse_tail_content && !leftover.is_empty() {
            Some(leftover.join("\n"))
        } else {
            None
        };

        let sections =
            pack::plan_sections(&lines, carry.as_deref()).map_err(ChainError::PayloadTooLarge)?;

        // Mutation phase. New records land in the tail's container.
        let mut next = RecordPointer::TERMINAL;
        let mut created = Vec::with_capacity(sections.len() - 1);
        for section in sections[1..].iter().rev() {
            let body = wire::compose_body(next, section).map_err(ChainError::PayloadTooLarge)?;
            let ptr = self.medium.create_record(&handle, &body).await?;
            created.push(ptr);
            next = ptr;
        }

        let new_tail_body =
            wire::compose_body(next, &sections[0]).map_err(ChainError::PayloadTooLarge)?;
        self.medium
            .edit_record(&handle, tail.record_id, &new_tail_body)
            .await?;

        created.reverse();
        debug!(new_records = created.len(), "append committed");
        self.chain.write().await.extend(created);
        Ok(())
    }
}

#[async_trait]
impl<C> ChainStore for ChainEngine<C>
where
    C: Codec + 'static,
{
    fn type_tag(&self) -> &'static str {
        self.codec.tag()
    }

    async fn chain(&self) -> Vec<RecordPointer> {
        ChainEngine::chain(self).await
    }

    async fn head(&self) -> Option<RecordPointer> {
        ChainEngine::head(self).await
    }

    async fn init(&self, container_id: u64) -> Result<RecordPointer> {
        ChainEngine::init(self, container_id).await
    }

    async fn load(&self, head: RecordPointer) -> Result<RecordPointer> {
        ChainEngine::load(self, head).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainpost_core::CoreError;
    use chainpost_medium::{MediumError, MemoryMedium};
    use chainpost_testkit::FlakyMedium;

    /// Identity codec: one payload line per element.
    struct LinesCodec;

    #[async_trait]
    impl Codec for LinesCodec {
        type Value = Vec<String>;

        fn tag(&self) -> &'static str {
            "lines"
        }

        async fn decode(&self, lines: Vec<String>) -> Result<Vec<String>> {
            Ok(lines)
        }

        async fn encode(&self, value: &Vec<String>) -> Result<Vec<String>> {
            Ok(value.clone())
        }
    }

    fn engine_on(medium: Arc<MemoryMedium>) -> ChainEngine<LinesCodec> {
        ChainEngine::new(medium, LinesCodec)
    }

    fn payload(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_init_creates_terminal_record() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium.clone());

        let head = engine.init(1).await.unwrap();
        assert_eq!(engine.chain().await, vec![head]);
        assert_eq!(medium.record_body(head).unwrap(), "0 0");
    }

    #[tokio::test]
    async fn test_load_after_init_yields_single_terminal_record() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let head = engine_on(medium.clone()).init(1).await.unwrap();

        let engine = engine_on(medium);
        engine.load(head).await.unwrap();
        assert_eq!(engine.chain().await, vec![head]);
    }

    #[tokio::test]
    async fn test_load_walks_linked_records() {
        let medium = Arc::new(MemoryMedium::new());
        medium.seed_record(RecordPointer::new(1, 12), "0 0\nthird");
        medium.seed_record(RecordPointer::new(1, 11), "1 12\nsecond");
        medium.seed_record(RecordPointer::new(1, 10), "1 11\nfirst");

        let engine = engine_on(medium);
        engine.load(RecordPointer::new(1, 10)).await.unwrap();
        assert_eq!(
            engine.chain().await,
            vec![
                RecordPointer::new(1, 10),
                RecordPointer::new(1, 11),
                RecordPointer::new(1, 12),
            ]
        );
        assert_eq!(
            engine.read_all().await.unwrap(),
            payload(&["first", "second", "third"])
        );
    }

    #[tokio::test]
    async fn test_load_crosses_containers_and_caches_handles() {
        let medium = Arc::new(MemoryMedium::new());
        medium.seed_record(RecordPointer::new(2, 21), "0 0\nb");
        medium.seed_record(RecordPointer::new(1, 20), "2 21\na");

        let engine = engine_on(medium.clone());
        engine.load(RecordPointer::new(1, 20)).await.unwrap();
        engine.read_all().await.unwrap();

        // One resolve per container, despite several fetches.
        assert_eq!(medium.stats().resolves, 2);
    }

    #[tokio::test]
    async fn test_load_corrupt_header() {
        let medium = Arc::new(MemoryMedium::new());
        medium.seed_record(RecordPointer::new(1, 10), "not a header\nx");

        let engine = engine_on(medium);
        assert!(matches!(
            engine.load(RecordPointer::new(1, 10)).await,
            Err(ChainError::CorruptChain { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_all_before_load_fails() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium);
        assert!(matches!(
            engine.read_all().await,
            Err(ChainError::EmptyChain)
        ));
    }

    #[tokio::test]
    async fn test_append_keeps_head_and_reuses_tail() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium.clone());
        let head = engine.init(1).await.unwrap();

        engine.append(&payload(&["a"]), true).await.unwrap();
        engine.append(&payload(&["b"]), true).await.unwrap();

        let chain = engine.chain().await;
        assert_eq!(chain[0], head);
        assert_eq!(chain.len(), 1);
        assert_eq!(medium.record_body(head).unwrap(), "0 0\na\nb\n");
        assert_eq!(engine.read_all().await.unwrap(), payload(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_append_spills_into_new_records_in_reverse_creation_order() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium.clone());
        let head = engine.init(1).await.unwrap();

        let line = "x".repeat(1000);
        let before = medium.stats();
        engine
            .append(&payload(&[&line, &line, &line]), true)
            .await
            .unwrap();
        let after = medium.stats();

        // Three sections: k = 3 records, so 2 creates and 1 edit.
        assert_eq!(after.creates - before.creates, 2);
        assert_eq!(after.edits - before.edits, 1);

        let chain = engine.chain().await;
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0], head);

        // In-memory chain order matches the on-medium links: the record
        // created last is linked first.
        assert!(chain[1].record_id > chain[2].record_id);

        // Walking from the head reproduces the same chain.
        let reloaded = engine_on(medium);
        reloaded.load(head).await.unwrap();
        assert_eq!(reloaded.chain().await, chain);
        assert_eq!(
            reloaded.read_all().await.unwrap(),
            payload(&[&line, &line, &line])
        );
    }

    #[tokio::test]
    async fn test_append_oversize_line_is_a_no_op() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium.clone());
        engine.init(1).await.unwrap();
        let before = medium.stats();

        let oversize = "x".repeat(1901);
        let err = engine.append(&payload(&[&oversize]), true).await;
        assert!(matches!(
            err,
            Err(ChainError::PayloadTooLarge(CoreError::LineTooLong { .. }))
        ));

        // Zero medium calls after the failed validation.
        assert_eq!(medium.stats(), before);
        assert_eq!(engine.chain().await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_before_init_fails() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium);
        assert!(matches!(
            engine.append(&payload(&["a"]), true).await,
            Err(ChainError::EmptyChain)
        ));
    }

    #[tokio::test]
    async fn test_rewrite_all_truncates_to_head() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium.clone());
        let head = engine.init(1).await.unwrap();

        let line = "x".repeat(1000);
        engine
            .append(&payload(&[&line, &line, &line]), true)
            .await
            .unwrap();
        assert_eq!(engine.chain().await.len(), 3);

        engine.rewrite_all(&payload(&["fresh"])).await.unwrap();
        let chain = engine.chain().await;
        assert_eq!(chain, vec![head]);
        assert_eq!(engine.read_all().await.unwrap(), payload(&["fresh"]));

        // The spilled records linger as orphans; nothing reclaims them.
        assert_eq!(medium.record_count(1), 3);
    }

    #[tokio::test]
    async fn test_rewrite_then_read_all_round_trips() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = engine_on(medium);
        engine.init(1).await.unwrap();

        for value in [
            payload(&["one"]),
            payload(&[]),
            payload(&["a", "b", "c"]),
            payload(&[&"y".repeat(1200), &"z".repeat(1200)]),
        ] {
            engine.rewrite_all(&value).await.unwrap();
            assert_eq!(engine.read_all().await.unwrap(), value);
        }
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_serialized() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let engine = Arc::new(engine_on(medium));
        let head = engine.init(1).await.unwrap();

        let line_a = "a".repeat(1500);
        let line_b = "b".repeat(1500);
        let (left, right) = tokio::join!(
            {
                let engine = Arc::clone(&engine);
                let line = line_a.clone();
                async move { engine.append(&vec![line], true).await }
            },
            {
                let engine = Arc::clone(&engine);
                let line = line_b.clone();
                async move { engine.append(&vec![line], true).await }
            },
        );
        left.unwrap();
        right.unwrap();

        // Both lines survive and the chain walks cleanly from the head.
        let mut lines = engine.read_all().await.unwrap();
        lines.sort();
        assert_eq!(lines, vec![line_a, line_b]);

        let rewalked = engine.chain().await;
        engine.load(head).await.unwrap();
        assert_eq!(engine.chain().await, rewalked);
    }

    #[tokio::test]
    async fn test_failed_append_leaves_published_chain_intact() {
        let medium = Arc::new(MemoryMedium::with_containers(&[1]));
        let setup = engine_on(medium.clone());
        let head = setup.init(1).await.unwrap();
        setup.append(&payload(&["kept"]), true).await.unwrap();

        // Budget covers the load walk and the tail fetch; the medium goes
        // away before anything is created or edited.
        let flaky = Arc::new(FlakyMedium::failing_after(medium.clone(), 3));
        let engine = ChainEngine::new(flaky as Arc<dyn RecordMedium>, LinesCodec);
        engine.load(head).await.unwrap();

        let line = "x".repeat(1000);
        let result = engine.append(&payload(&[&line, &line, &line]), true).await;
        assert!(matches!(result, Err(ChainError::Medium(MediumError::Unavailable(_)))));

        // The old tail was never edited, so a fresh walk sees the old chain.
        let reloaded = engine_on(medium);
        reloaded.load(head).await.unwrap();
        assert_eq!(reloaded.chain().await, vec![head]);
        assert_eq!(reloaded.read_all().await.unwrap(), payload(&["kept"]));
    }
}
