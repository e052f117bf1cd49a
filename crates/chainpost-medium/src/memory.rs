//! In-memory implementation of the medium, for tests.
//!
//! Same semantics as a real size-limited messaging backend: containers must
//! exist before use, record ids are allocated monotonically, bodies over the
//! record ceiling are rejected. Per-operation counters let tests assert that
//! an operation performed no medium calls at all.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use chainpost_core::{units, RecordPointer, MAX_RECORD_UNITS};

use crate::error::{MediumError, Result};
use crate::traits::{ContainerHandle, RecordMedium};

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediumStats {
    pub resolves: u64,
    pub creates: u64,
    pub fetches: u64,
    pub edits: u64,
}

impl MediumStats {
    /// Total number of medium calls.
    pub fn total(&self) -> u64 {
        self.resolves + self.creates + self.fetches + self.edits
    }
}

/// In-memory medium. Thread-safe via RwLock; all data is lost on drop.
pub struct MemoryMedium {
    inner: RwLock<MemoryMediumInner>,
}

struct MemoryMediumInner {
    /// Record bodies per container, keyed by record id.
    containers: HashMap<u64, BTreeMap<u64, String>>,
    /// Next record id; ids are unique across containers.
    next_record_id: u64,
    stats: MediumStats,
}

impl MemoryMedium {
    /// Create an empty medium with no containers.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryMediumInner {
                containers: HashMap::new(),
                next_record_id: 1,
                stats: MediumStats::default(),
            }),
        }
    }

    /// Create a medium with the given containers pre-created.
    pub fn with_containers(container_ids: &[u64]) -> Self {
        let medium = Self::new();
        for &id in container_ids {
            medium.add_container(id);
        }
        medium
    }

    /// Add a container.
    pub fn add_container(&self, container_id: u64) {
        let mut inner = self.inner.write().unwrap();
        inner.containers.entry(container_id).or_default();
    }

    /// Place a record at an explicit pointer, as if written by an earlier
    /// run. The container is created if missing and the id allocator is
    /// bumped past the record id.
    pub fn seed_record(&self, ptr: RecordPointer, body: &str) {
        let mut inner = self.inner.write().unwrap();
        inner
            .containers
            .entry(ptr.container_id)
            .or_default()
            .insert(ptr.record_id, body.to_string());
        if ptr.record_id >= inner.next_record_id {
            inner.next_record_id = ptr.record_id + 1;
        }
    }

    /// Snapshot of the call counters.
    pub fn stats(&self) -> MediumStats {
        self.inner.read().unwrap().stats
    }

    /// Body of a record, bypassing the counters. Test inspection only.
    pub fn record_body(&self, ptr: RecordPointer) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner
            .containers
            .get(&ptr.container_id)
            .and_then(|c| c.get(&ptr.record_id))
            .cloned()
    }

    /// Number of records in a container, bypassing the counters.
    pub fn record_count(&self, container_id: u64) -> usize {
        let inner = self.inner.read().unwrap();
        inner
            .containers
            .get(&container_id)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    fn check_body(body: &str) -> Result<()> {
        let n = units(body);
        if n > MAX_RECORD_UNITS {
            return Err(MediumError::BodyTooLarge {
                units: n,
                limit: MAX_RECORD_UNITS,
            });
        }
        Ok(())
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordMedium for MemoryMedium {
    async fn resolve_container(&self, container_id: u64) -> Result<ContainerHandle> {
        let mut inner = self.inner.write().unwrap();
        inner.stats.resolves += 1;
        if !inner.containers.contains_key(&container_id) {
            return Err(MediumError::ContainerNotFound(container_id));
        }
        Ok(ContainerHandle::new(container_id))
    }

    async fn create_record(
        &self,
        container: &ContainerHandle,
        body: &str,
    ) -> Result<RecordPointer> {
        Self::check_body(body)?;
        let mut inner = self.inner.write().unwrap();
        inner.stats.creates += 1;
        let container_id = container.container_id();
        if !inner.containers.contains_key(&container_id) {
            return Err(MediumError::ContainerNotFound(container_id));
        }
        let record_id = inner.next_record_id;
        inner.next_record_id += 1;
        inner
            .containers
            .get_mut(&container_id)
            .expect("container checked above")
            .insert(record_id, body.to_string());
        Ok(RecordPointer::new(container_id, record_id))
    }

    async fn fetch_record(&self, container: &ContainerHandle, record_id: u64) -> Result<String> {
        let mut inner = self.inner.write().unwrap();
        inner.stats.fetches += 1;
        let container_id = container.container_id();
        inner
            .containers
            .get(&container_id)
            .ok_or(MediumError::ContainerNotFound(container_id))?
            .get(&record_id)
            .cloned()
            .ok_or(MediumError::RecordNotFound {
                container_id,
                record_id,
            })
    }

    async fn edit_record(
        &self,
        container: &ContainerHandle,
        record_id: u64,
        body: &str,
    ) -> Result<()> {
        Self::check_body(body)?;
        let mut inner = self.inner.write().unwrap();
        inner.stats.edits += 1;
        let container_id = container.container_id();
        let records = inner
            .containers
            .get_mut(&container_id)
            .ok_or(MediumError::ContainerNotFound(container_id))?;
        let slot = records.get_mut(&record_id).ok_or(MediumError::RecordNotFound {
            container_id,
            record_id,
        })?;
        *slot = body.to_string();
        Ok(())
    }
}
