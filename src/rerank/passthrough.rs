use async_trait::async_trait;

use super::error::RerankResult;
use super::RerankEngine;
use crate::retrieval::{CandidateResult, product_ids};

/// Keeps the retrieval order. Used when no chat provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughReranker;

#[async_trait]
impl RerankEngine for PassthroughReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: &[CandidateResult],
    ) -> RerankResult<Vec<String>> {
        Ok(product_ids(candidates))
    }
}
