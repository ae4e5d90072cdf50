use crate::elastic::ElasticError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by cache stores.
pub enum CacheError {
    /// The backing index failed.
    #[error("cache index error: {0}")]
    Index(#[from] ElasticError),

    /// The store is not reachable.
    #[error("cache unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
