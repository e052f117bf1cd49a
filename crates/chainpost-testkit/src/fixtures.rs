//! Medium fixtures for failure-path tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use chainpost_core::RecordPointer;
use chainpost_medium::{ContainerHandle, MediumError, RecordMedium, Result};

/// A medium that works for a fixed number of calls, then fails every call
/// with [`MediumError::Unavailable`].
///
/// Useful for asserting the commit-point behavior of append: as long as the
/// tail edit never happens, a failed append must leave the published chain
/// walkable and unchanged.
pub struct FlakyMedium {
    inner: Arc<dyn RecordMedium>,
    budget: AtomicU64,
}

impl FlakyMedium {
    /// Wrap `inner`, allowing exactly `calls` successful calls.
    pub fn failing_after(inner: Arc<dyn RecordMedium>, calls: u64) -> Self {
        Self {
            inner,
            budget: AtomicU64::new(calls),
        }
    }

    fn spend(&self) -> Result<()> {
        // Saturating claim of one call from the budget.
        let claimed = self
            .budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |b| b.checked_sub(1))
            .is_ok();
        if claimed {
            Ok(())
        } else {
            Err(MediumError::Unavailable("injected failure".to_string()))
        }
    }

    /// Calls still allowed to succeed.
    pub fn remaining(&self) -> u64 {
        self.budget.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordMedium for FlakyMedium {
    async fn resolve_container(&self, container_id: u64) -> Result<ContainerHandle> {
        self.spend()?;
        self.inner.resolve_container(container_id).await
    }

    async fn create_record(
        &self,
        container: &ContainerHandle,
        body: &str,
    ) -> Result<RecordPointer> {
        self.spend()?;
        self.inner.create_record(container, body).await
    }

    async fn fetch_record(&self, container: &ContainerHandle, record_id: u64) -> Result<String> {
        self.spend()?;
        self.inner.fetch_record(container, record_id).await
    }

    async fn edit_record(
        &self,
        container: &ContainerHandle,
        record_id: u64,
        body: &str,
    ) -> Result<()> {
        self.spend()?;
        self.inner.edit_record(container, record_id, body).await
    }
}
