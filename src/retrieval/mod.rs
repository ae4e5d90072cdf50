//! Product retrieval against the inventory index.
//!
//! The [`RetrievalEngine`] trait is the seam the intent engine and the search orchestrator talk
//! to; [`ElasticRetrieval`] is the production implementation.

pub mod elastic;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;
pub mod query;


use async_trait::async_trait;

pub use elastic::ElasticRetrieval;
pub use error::{RetrievalError, RetrievalResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRetrieval;
pub use model::{CandidateResult, CategoryCount, CategoryHierarchy, product_ids};
pub use query::{KnnSearch, SourceFilter};

/// Read access to the product index.
#[async_trait]
pub trait RetrievalEngine: Send + Sync {
    /// Hierarchy fields of the nearest neighbours of an intent probe, in rank order.
    async fn probe_hierarchy(
        &self,
        request: &KnnSearch,
    ) -> RetrievalResult<Vec<CategoryHierarchy>>;

    /// Ranked candidates for a main retrieval request.
    async fn knn_search(&self, request: &KnnSearch) -> RetrievalResult<Vec<CandidateResult>>;

    /// Full records for `ids`. Order is unspecified and unknown ids are absent.
    async fn fetch_by_ids(&self, ids: &[String]) -> RetrievalResult<Vec<CandidateResult>>;

    /// The first `size` products of the index.
    async fn browse(&self, size: usize) -> RetrievalResult<Vec<CandidateResult>>;

    /// Top-level categories with product counts.
    async fn categories(&self) -> RetrievalResult<Vec<CategoryCount>>;

    /// `true` when the backing index answers.
    async fn is_ready(&self) -> bool;
}
