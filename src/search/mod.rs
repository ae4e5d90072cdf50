//! Request-facing search pipeline.
//!
//! A cache hit returns the reranked ordering without touching embeddings or nearest-neighbour
//! retrieval. A miss embeds the query, infers its category intent, retrieves an over-fetched
//! candidate set, hands the whole set to the rerank dispatcher and returns the first page of
//! the retrieval order. Latency never includes the rerank call.

pub mod error;
pub mod types;


use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::cache::CacheStore;
use crate::constants::RECOMMENDATION_SLACK;
use crate::dispatch::RerankDispatcher;
use crate::embedding::{Embedder, EmbeddingError};
use crate::intent::{IntentInferenceEngine, augmented_query};
use crate::query::{DedupKey, QueryType};
use crate::retrieval::{CandidateResult, CategoryCount, KnnSearch, RetrievalEngine};

pub use crate::cache::SearchStatus;
pub use error::{SearchError, SearchResult};
pub use types::{SearchRequest, SearchResponse};

/// Composes cache, intent inference, retrieval and rerank dispatch.
#[derive(Clone)]
pub struct SearchOrchestrator {
    embedder: Arc<dyn Embedder>,
    intent: IntentInferenceEngine,
    retrieval: Arc<dyn RetrievalEngine>,
    cache: Arc<dyn CacheStore>,
    dispatcher: RerankDispatcher,
}

impl SearchOrchestrator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        retrieval: Arc<dyn RetrievalEngine>,
        cache: Arc<dyn CacheStore>,
        dispatcher: RerankDispatcher,
    ) -> Self {
        Self {
            embedder,
            intent: IntentInferenceEngine::new(retrieval.clone()),
            retrieval,
            cache,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &RerankDispatcher {
        &self.dispatcher
    }

    /// Returns at most `request.size` items.
    #[instrument(
        skip(self, request),
        fields(
            query = %request.query,
            query_type = %request.query_type,
            offset = request.offset,
            size = request.size
        )
    )]
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        let key = DedupKey::from_raw(&request.query, request.query_type);
        if key.query().is_empty() {
            return Err(SearchError::InvalidRequest {
                reason: "query must not be empty".to_string(),
            });
        }
        if request.size == 0 {
            return Err(SearchError::InvalidRequest {
                reason: "size must be greater than zero".to_string(),
            });
        }

        if let Some(items) = self.cached(&key, request.size).await {
            info!(items = items.len(), "serving reranked results from cache");
            return Ok(SearchResponse {
                items,
                status: SearchStatus::HitCache,
                dispatch: None,
            });
        }

        let started = Instant::now();
        let query_vector = self.embed(key.query().to_string()).await?;
        let hierarchy = self.intent.infer_hierarchy(query_vector).await?;

        let augmented = augmented_query(key.query().as_str(), &hierarchy);
        let augmented_vector = self.embed(augmented).await?;
        let knn = KnnSearch::main(augmented_vector, request.offset, request.size, &hierarchy);
        let candidates = self.retrieval.knn_search(&knn).await?;
        debug!(
            candidates = candidates.len(),
            boosted = knn.boost.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "retrieval finished"
        );

        let items: Vec<CandidateResult> =
            candidates.iter().take(request.size).cloned().collect();
        let dispatch = if candidates.is_empty() {
            None
        } else {
            Some(self.dispatcher.dispatch(key, candidates))
        };

        Ok(SearchResponse {
            items,
            status: SearchStatus::Miss,
            dispatch,
        })
    }

    /// Products similar to `item_name`, excluding `item_id` itself.
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        item_name: &str,
        item_id: &str,
        limit: usize,
    ) -> SearchResult<SearchResponse> {
        let request = SearchRequest::new(item_name)
            .with_size(limit.saturating_add(RECOMMENDATION_SLACK))
            .with_type(QueryType::Recommendations);

        let mut response = self.search(&request).await?;
        response.items.retain(|item| item.product_id != item_id);
        response.items.truncate(limit);
        Ok(response)
    }

    /// Top-level categories, most populated first.
    pub async fn categories(&self) -> SearchResult<Vec<CategoryCount>> {
        let mut categories = self.retrieval.categories().await?;
        categories.sort_by(|a, b| b.product_count.cmp(&a.product_count));
        Ok(categories)
    }

    /// The first `size` products of the catalog.
    pub async fn browse(&self, size: usize) -> SearchResult<Vec<CandidateResult>> {
        Ok(self.retrieval.browse(size).await?)
    }

    pub async fn is_ready(&self) -> bool {
        self.retrieval.is_ready().await
    }

    /// Cached ordering hydrated to full records. Any cache or hydration failure is a miss.
    async fn cached(&self, key: &DedupKey, size: usize) -> Option<Vec<CandidateResult>> {
        let entry = match self.cache.lookup(key).await {
            Ok(Some(entry)) if !entry.is_empty() => entry,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "cache lookup failed, treating as miss");
                return None;
            }
        };

        let records = match self.retrieval.fetch_by_ids(&entry.product_ids).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "failed to load cached products, treating as miss");
                return None;
            }
        };

        let items = order_by_ids(&entry.product_ids, records, size);
        if items.is_empty() {
            debug!("cached products no longer in the index");
            return None;
        }
        Some(items)
    }

    async fn embed(&self, text: String) -> SearchResult<Vec<f32>> {
        let embedder = self.embedder.clone();
        let vector = tokio::task::spawn_blocking(move || embedder.embed(&text))
            .await
            .map_err(|e| EmbeddingError::TaskFailed {
                reason: e.to_string(),
            })??;
        Ok(vector)
    }
}

/// Arranges `records` in the order of `ids`, dropping unknown and repeated ids.
pub fn order_by_ids(
    ids: &[String],
    records: Vec<CandidateResult>,
    limit: usize,
) -> Vec<CandidateResult> {
    let mut by_id: HashMap<String, CandidateResult> = records
        .into_iter()
        .map(|record| (record.product_id.clone(), record))
        .collect();

    ids.iter()
        .filter_map(|id| by_id.remove(id))
        .take(limit)
        .collect()
}
