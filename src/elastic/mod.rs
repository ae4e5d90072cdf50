//! Elasticsearch integration (JSON over HTTP).
//!
//! [`ElasticClient`] is shared by the retrieval engine and the cache store; each adapter owns its
//! index name and body shapes.

pub mod client;
pub mod error;
pub mod model;


pub use client::{ElasticClient, ElasticConfig};
pub use error::ElasticError;
pub use model::{GetResponse, Hit, Hits, SearchResponse, TermsBucket, TotalHits};

/// Default Elasticsearch endpoint.
pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

/// Default product index.
pub const DEFAULT_INVENTORY_INDEX: &str = "flipkart_products";

/// Default rerank cache index.
pub const DEFAULT_CACHE_INDEX: &str = "cached_search_results";
