//! Aisle library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Request path
//! - [`SearchOrchestrator`], [`SearchRequest`], [`SearchResponse`] - search pipeline
//! - [`IntentInferenceEngine`] - category intent from nearest neighbours
//! - [`NormalizedQuery`], [`QueryType`], [`DedupKey`] - query identity
//!
//! ## Background reranking
//! - [`RerankDispatcher`], [`RerankWorkerPool`], [`InFlightSet`] - deduplicated job queue
//! - [`RerankEngine`], [`LlmReranker`], [`PassthroughReranker`] - ranking backends
//!
//! ## Collaborators
//! - [`RetrievalEngine`], [`ElasticRetrieval`] - product index
//! - [`CacheStore`], [`ElasticCacheStore`], [`MemoryCacheStore`] - reranked orderings
//! - [`Embedder`], [`SentenceEmbedder`] - query embeddings
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod elastic;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod intent;
pub mod query;
pub mod rerank;
pub mod retrieval;
pub mod search;

pub use cache::{
    AISLE_STATUS_HEADER, CacheEntry, CacheError, CacheStore, ElasticCacheStore,
    MemoryCacheStore, SearchStatus,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockCacheStore;

pub use config::{CacheBackend, Config, ConfigError};
pub use dispatch::{
    DispatchConfig, DispatchOutcome, InFlightGuard, InFlightSet, JobReport, RerankDispatcher,
    RerankJob, RerankWorkerPool,
};
pub use elastic::{ElasticClient, ElasticConfig, ElasticError};
pub use embedding::{Embedder, EmbedderConfig, EmbeddingError, SentenceEmbedder};
pub use hashing::{cache_document_id, hash_dedup_key};
pub use intent::{IntentInferenceEngine, augmented_query, most_frequent};
pub use query::{DedupKey, NormalizedQuery, QueryType, normalize};

pub use rerank::{LlmReranker, PassthroughReranker, RerankEngine, RerankError, RerankOutcome};
#[cfg(any(test, feature = "mock"))]
pub use rerank::{MockBehavior, MockReranker};

pub use retrieval::{
    CandidateResult, CategoryCount, CategoryHierarchy, ElasticRetrieval, KnnSearch,
    RetrievalEngine, RetrievalError,
};
#[cfg(any(test, feature = "mock"))]
pub use retrieval::MockRetrieval;

pub use search::{SearchError, SearchOrchestrator, SearchRequest, SearchResponse};
