//! Sentence embeddings for queries.
//!
//! The search path embeds two texts per cache miss: the normalized query (for intent
//! inference) and the augmented query (for the main retrieval). [`Embedder`] is the seam; the
//! production implementation is [`SentenceEmbedder`].

/// BERT encoder with mean pooling.
pub mod bert;
/// Embedder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder (model or stub backend).
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;


pub use config::{EMBEDDING_DIM, EmbedderConfig, MAX_SEQ_LEN};
pub use error::EmbeddingError;
pub use sentence::SentenceEmbedder;

/// Turns text into a dense vector comparable with the index's `embedding` field.
///
/// Implementations are synchronous and CPU bound; async callers run them on the blocking pool.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of every vector returned by [`Embedder::embed`].
    fn dimension(&self) -> usize;
}

/// Scales `vector` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
