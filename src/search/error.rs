use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
/// Failures visible to search callers. Cache and rerank faults never surface here.
pub enum SearchError {
    /// The request is malformed.
    #[error("invalid search request: {reason}")]
    InvalidRequest {
        /// Error message.
        reason: String,
    },

    /// Embedding the query failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The product index failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

/// Convenience result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
