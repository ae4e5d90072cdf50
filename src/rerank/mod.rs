//! Relevance reranking of retrieved candidates.
//!
//! Engines return a reordered id list or an error. [`RerankOutcome::resolve`] turns that into
//! the ordering that gets cached: the engine's order when it is a valid permutation, otherwise
//! the original retrieval order.

pub mod error;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod passthrough;
pub mod prompt;


use async_trait::async_trait;

use crate::retrieval::{CandidateResult, product_ids};

pub use error::{RerankError, RerankResult};
pub use llm::{DEFAULT_RERANK_MODEL, LlmReranker};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBehavior, MockReranker};
pub use parse::{ensure_permutation, parse_ranking};
pub use passthrough::PassthroughReranker;

/// Reorders candidates by relevance to `query`.
#[async_trait]
pub trait RerankEngine: Send + Sync {
    /// Returns the candidate ids in the new order.
    async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidateResult],
    ) -> RerankResult<Vec<String>>;
}

/// The ordering to cache for a finished rerank attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerankOutcome {
    Reranked(Vec<String>),
    Fallback { ids: Vec<String>, reason: String },
}

impl RerankOutcome {
    /// Accepts `result` only if it is a permutation of `candidates`; otherwise falls back to
    /// the candidates' own order.
    pub fn resolve(result: RerankResult<Vec<String>>, candidates: &[CandidateResult]) -> Self {
        let checked = result.and_then(|ids| ensure_permutation(&ids, candidates).map(|()| ids));

        match checked {
            Ok(ids) => RerankOutcome::Reranked(ids),
            Err(e) => RerankOutcome::Fallback {
                ids: product_ids(candidates),
                reason: e.to_string(),
            },
        }
    }

    pub fn ids(&self) -> &[String] {
        match self {
            RerankOutcome::Reranked(ids) | RerankOutcome::Fallback { ids, .. } => ids,
        }
    }

    pub fn into_ids(self) -> Vec<String> {
        match self {
            RerankOutcome::Reranked(ids) | RerankOutcome::Fallback { ids, .. } => ids,
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, RerankOutcome::Fallback { .. })
    }
}
