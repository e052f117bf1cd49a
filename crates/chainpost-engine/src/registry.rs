//! Registry mapping directory type tags to store constructors.

use std::collections::BTreeMap;
use std::sync::Arc;

use chainpost_medium::RecordMedium;

use crate::error::{ChainError, Result};
use crate::store::ChainStore;

type Factory = Arc<dyn Fn(Arc<dyn RecordMedium>) -> Arc<dyn ChainStore> + Send + Sync>;

/// Static mapping from type tag to store constructor.
///
/// Each constructor produces a fresh, unloaded store over the given medium.
/// Unknown tags resolve to `None`; there is no fall-through default.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    factories: BTreeMap<String, Factory>,
}

impl CodecRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `tag`, replacing any previous one.
    pub fn register<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(Arc<dyn RecordMedium>) -> Arc<dyn ChainStore> + Send + Sync + 'static,
    {
        self.factories.insert(tag.to_string(), Arc::new(factory));
    }

    /// Construct an unloaded store for `tag`, if registered.
    pub fn make(&self, tag: &str, medium: Arc<dyn RecordMedium>) -> Option<Arc<dyn ChainStore>> {
        self.factories.get(tag).map(|factory| factory(medium))
    }

    /// Like [`make`](Self::make), but an unknown tag is an error.
    pub fn make_required(
        &self,
        tag: &str,
        medium: Arc<dyn RecordMedium>,
    ) -> Result<Arc<dyn ChainStore>> {
        self.make(tag, medium)
            .ok_or_else(|| ChainError::UnknownType(tag.to_string()))
    }

    /// Whether `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
