use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{CacheError, CacheResult};
use super::types::CacheEntry;
use super::CacheStore;
use crate::query::DedupKey;

/// In-memory [`CacheStore`] with call counters and failure injection.
#[derive(Default)]
pub struct MockCacheStore {
    entries: Mutex<HashMap<DedupKey, Vec<String>>>,
    lookups: AtomicUsize,
    puts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry without counting it as a put.
    pub fn insert(&self, key: DedupKey, product_ids: Vec<String>) {
        self.entries.lock().insert(key, product_ids);
    }

    pub fn get(&self, key: &DedupKey) -> Option<Vec<String>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn lookup(&self, key: &DedupKey) -> CacheResult<Option<CacheEntry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "mock read failure".to_string(),
            });
        }
        Ok(self.get(key).map(|ids| CacheEntry::new(key.clone(), ids)))
    }

    async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "mock write failure".to_string(),
            });
        }
        self.insert(entry.key.clone(), entry.product_ids.clone());
        Ok(())
    }
}
