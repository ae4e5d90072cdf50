//! Cross-cutting, shared constants.
//!
//! Retrieval shapes (k, candidate counts, boosts) are fixed by the index contract and shared by
//! the query builders and their tests. Prefer deriving secondary values from these.

/// Index field holding the dense product embedding. Always excluded from returned documents.
pub const EMBEDDING_FIELD: &str = "embedding";

/// Index field holding the product identifier.
pub const PRODUCT_ID_FIELD: &str = "product_id";

/// The four category hierarchy fields, most general first.
pub const HIERARCHY_FIELDS: [&str; 4] = [
    "category",
    "sub_category",
    "sub_sub_category",
    "sub_sub_sub_category",
];

/// Term boosts applied per hierarchy level, aligned with [`HIERARCHY_FIELDS`].
pub const HIERARCHY_BOOSTS: [f32; 4] = [1.5, 2.0, 3.0, 4.0];

/// Neighbours consulted when inferring the category hierarchy of a query.
pub const INTENT_PROBE_K: usize = 5;

/// Nearest-neighbour `k` for the main retrieval.
pub const KNN_K: usize = 75;

/// Candidate pool size per shard for nearest-neighbour search.
pub const KNN_NUM_CANDIDATES: usize = 100;

/// Extra hits requested beyond the page size so the reranker sees a superset.
pub const OVER_FETCH: usize = 30;

/// Default bounded rerank queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default number of rerank workers.
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// Default per-job rerank timeout.
pub const DEFAULT_RERANK_TIMEOUT_SECS: u64 = 60;

/// Default sentence embedding dimension (MiniLM-L6 class models).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default max tokens fed to the sentence embedder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Default page size for search.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size accepted by the gateway.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default number of products returned by browse.
pub const DEFAULT_BROWSE_SIZE: usize = 15;

/// Default number of recommendations on a product page.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Extra results requested for recommendations so the source item can be dropped.
pub const RECOMMENDATION_SLACK: usize = 2;

/// Max category buckets returned by the categories aggregation.
pub const CATEGORY_AGG_SIZE: usize = 1000;
