use std::path::PathBuf;
use thiserror::Error;

/// Failures of the sentence embedder, from model loading to a single `embed` call.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence model directory missing: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("could not load sentence encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("forward pass over query text failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize query text: {reason}")]
    TokenizationFailed { reason: String },

    #[error("embedder settings rejected: {reason}")]
    InvalidConfig { reason: String },

    #[error("blocking embed task aborted: {reason}")]
    TaskFailed { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: format!("reading model files: {}", err),
        }
    }
}
