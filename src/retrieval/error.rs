use thiserror::Error;

use crate::elastic::ElasticError;

#[derive(Debug, Error)]
/// Errors returned by the retrieval engine.
pub enum RetrievalError {
    /// The search index failed or answered with an error.
    #[error("search index error: {0}")]
    Index(#[from] ElasticError),

    /// The engine is not able to serve requests.
    #[error("retrieval unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for retrieval operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;
