use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::elastic::ElasticClient;

use super::error::RetrievalResult;
use super::model::{CandidateResult, CategoryCount, CategoryHierarchy};
use super::query::{self, CATEGORIES_AGG, KnnSearch};
use super::RetrievalEngine;

/// [`RetrievalEngine`] backed by an Elasticsearch inventory index.
#[derive(Debug, Clone)]
pub struct ElasticRetrieval {
    client: ElasticClient,
    index: String,
}

impl ElasticRetrieval {
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
impl RetrievalEngine for ElasticRetrieval {
    #[instrument(skip(self, request), fields(k = request.k))]
    async fn probe_hierarchy(
        &self,
        request: &KnnSearch,
    ) -> RetrievalResult<Vec<CategoryHierarchy>> {
        let response = self
            .client
            .search::<CategoryHierarchy>(&self.index, &request.to_body())
            .await?;
        Ok(response.into_sources())
    }

    #[instrument(
        skip(self, request),
        fields(from = request.from, size = request.size, boosted = request.boost.is_some())
    )]
    async fn knn_search(&self, request: &KnnSearch) -> RetrievalResult<Vec<CandidateResult>> {
        let response = self
            .client
            .search::<CandidateResult>(&self.index, &request.to_body())
            .await?;
        debug!(
            total = response.total(),
            returned = response.hits.hits.len(),
            "knn search done"
        );
        Ok(response.into_sources())
    }

    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    async fn fetch_by_ids(&self, ids: &[String]) -> RetrievalResult<Vec<CandidateResult>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .search::<CandidateResult>(&self.index, &query::ids_query(ids))
            .await?;
        Ok(response.into_sources())
    }

    #[instrument(skip(self))]
    async fn browse(&self, size: usize) -> RetrievalResult<Vec<CandidateResult>> {
        let response = self
            .client
            .search::<CandidateResult>(&self.index, &query::browse_query(size))
            .await?;
        Ok(response.into_sources())
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> RetrievalResult<Vec<CategoryCount>> {
        let response = self
            .client
            .search::<serde_json::Value>(&self.index, &query::categories_query())
            .await?;

        Ok(response
            .terms_buckets(CATEGORIES_AGG)?
            .into_iter()
            .map(|bucket| CategoryCount {
                category: bucket.key,
                product_count: bucket.doc_count,
            })
            .collect())
    }

    async fn is_ready(&self) -> bool {
        self.client.ping().await.is_ok()
    }
}
