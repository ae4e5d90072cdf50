//! Reranked-ordering cache keyed by [`DedupKey`].
//!
//! The orchestrator reads it on every request, and rerank workers are its only writers. Writes
//! overwrite (last write wins) and entries never expire on their own.

pub mod elastic;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


use async_trait::async_trait;

use crate::query::DedupKey;

pub use elastic::{CachedDocument, ElasticCacheStore};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCacheStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCacheStore;
pub use types::{
    AISLE_STATUS_ERROR, AISLE_STATUS_HEADER, AISLE_STATUS_HEALTHY, AISLE_STATUS_NOT_READY,
    AISLE_STATUS_READY, CacheEntry, SearchStatus,
};

/// Narrow contract over the store that holds reranked orderings.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Exact match on the `(query, type)` pair.
    async fn lookup(&self, key: &DedupKey) -> CacheResult<Option<CacheEntry>>;

    /// Stores `entry`, replacing any prior entry for the same key.
    async fn put(&self, entry: &CacheEntry) -> CacheResult<()>;
}
