use serde::{Deserialize, Serialize};

use crate::query::DedupKey;

pub const AISLE_STATUS_HEADER: &str = "X-Aisle-Status";
pub const AISLE_STATUS_HEALTHY: &str = "healthy";
pub const AISLE_STATUS_READY: &str = "ready";
pub const AISLE_STATUS_NOT_READY: &str = "not_ready";
pub const AISLE_STATUS_ERROR: &str = "error";

/// How a search request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    /// Served from a reranked cache entry.
    HitCache,
    /// Served from live retrieval.
    Miss,
}

impl SearchStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            SearchStatus::HitCache => "HIT_CACHE",
            SearchStatus::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, SearchStatus::HitCache)
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}

/// A reranked ordering of product ids for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: DedupKey,
    pub product_ids: Vec<String>,
}

impl CacheEntry {
    pub fn new(key: DedupKey, product_ids: Vec<String>) -> Self {
        Self { key, product_ids }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }
}
