//! In-process cache store.
//!
//! Bounded by entry count with `moka` eviction. Suitable for a single node and for tests; the
//! Elasticsearch store is the shared, persistent option.

use std::sync::Arc;

use async_trait::async_trait;
use moka::sync::Cache;

use super::error::CacheResult;
use super::types::CacheEntry;
use super::CacheStore;
use crate::query::DedupKey;

pub struct MemoryCacheStore {
    entries: Cache<DedupKey, Arc<[String]>>,
}

impl MemoryCacheStore {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    /// Creates a store with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a store holding at most `capacity` entries.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the number of cached entries.
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn contains(&self, key: &DedupKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Runs any pending maintenance tasks in the underlying cache.
    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn lookup(&self, key: &DedupKey) -> CacheResult<Option<CacheEntry>> {
        Ok(self
            .entries
            .get(key)
            .map(|ids| CacheEntry::new(key.clone(), ids.to_vec())))
    }

    async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
        self.entries
            .insert(entry.key.clone(), Arc::from(entry.product_ids.as_slice()));
        Ok(())
    }
}
