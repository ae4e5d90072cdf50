use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::CacheResult;
use super::types::CacheEntry;
use super::CacheStore;
use crate::elastic::ElasticClient;
use crate::hashing::cache_document_id;
use crate::query::DedupKey;

/// Stored shape of a cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDocument {
    pub user_query: String,
    #[serde(rename = "_type")]
    pub query_type: String,
    #[serde(default)]
    pub cached_product_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<String>,
}

impl CachedDocument {
    /// Whether this document was stored for `key`.
    pub fn matches(&self, key: &DedupKey) -> bool {
        self.user_query == key.query().as_str() && self.query_type == key.query_type().as_str()
    }
}

/// [`CacheStore`] persisted in an Elasticsearch index.
///
/// Each key maps to one document whose id is derived from the key, so `put` replaces instead of
/// appending. Lookups use the real-time get API, so an entry is readable as soon as `put`
/// returns.
#[derive(Debug, Clone)]
pub struct ElasticCacheStore {
    client: ElasticClient,
    index: String,
}

impl ElasticCacheStore {
    pub fn new(client: ElasticClient, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }
}

#[async_trait]
impl CacheStore for ElasticCacheStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn lookup(&self, key: &DedupKey) -> CacheResult<Option<CacheEntry>> {
        let document = self
            .client
            .get_document::<CachedDocument>(&self.index, &cache_document_id(key))
            .await?;

        let entry = document
            .filter(|doc| doc.matches(key))
            .map(|doc| CacheEntry::new(key.clone(), doc.cached_product_ids));
        debug!(hit = entry.is_some(), "cache lookup");
        Ok(entry)
    }

    #[instrument(skip(self, entry), fields(key = %entry.key, ids = entry.product_ids.len()))]
    async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
        let document = CachedDocument {
            user_query: entry.key.query().as_str().to_string(),
            query_type: entry.key.query_type().as_str().to_string(),
            cached_product_ids: entry.product_ids.clone(),
            cached_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        self.client
            .put_document(&self.index, &cache_document_id(&entry.key), &document)
            .await?;
        Ok(())
    }
}
