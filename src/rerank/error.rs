use thiserror::Error;

#[derive(Debug, Error)]
/// Ways a rerank attempt can fail. All of them lead to the fallback ordering.
pub enum RerankError {
    /// The chat provider call failed.
    #[error("rerank provider error: {reason}")]
    Provider {
        /// Error message.
        reason: String,
    },

    /// The response was not a bare list of ids.
    #[error("unparsable rerank output: {reason}")]
    Parse {
        /// Error message.
        reason: String,
    },

    /// The ids were parsed but are not a reordering of the candidates.
    #[error("rerank output is not a permutation of the candidates: {reason}")]
    NotPermutation {
        /// Error message.
        reason: String,
    },

    /// The engine did not answer in time.
    #[error("rerank timed out after {secs}s")]
    Timeout {
        /// Configured timeout.
        secs: u64,
    },

    /// The engine task panicked.
    #[error("rerank task panicked: {reason}")]
    Panicked {
        /// Panic message, when available.
        reason: String,
    },
}

/// Convenience result type for rerank operations.
pub type RerankResult<T> = Result<T, RerankError>;
