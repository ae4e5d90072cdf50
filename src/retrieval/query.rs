//! Request bodies sent to the search index.
//!
//! [`KnnSearch`] is the typed form of both nearest-neighbour call shapes; it is what the
//! retrieval engine receives, so tests can assert on it without decoding JSON.

use serde_json::{Value, json};

use crate::constants::{
    CATEGORY_AGG_SIZE, EMBEDDING_FIELD, HIERARCHY_BOOSTS, HIERARCHY_FIELDS, INTENT_PROBE_K,
    KNN_K, KNN_NUM_CANDIDATES, OVER_FETCH, PRODUCT_ID_FIELD,
};

use super::model::CategoryHierarchy;

/// Name of the categories aggregation in [`categories_query`].
pub const CATEGORIES_AGG: &str = "categories";

/// Which `_source` fields come back with each hit.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFilter {
    /// Only the listed fields.
    Includes(Vec<String>),
    /// Everything except the embedding vector.
    ExcludeEmbedding,
}

impl SourceFilter {
    fn to_json(&self) -> Value {
        match self {
            SourceFilter::Includes(fields) => json!(fields),
            SourceFilter::ExcludeEmbedding => json!({ "excludes": [EMBEDDING_FIELD] }),
        }
    }
}

/// A nearest-neighbour query with optional hierarchy term boosts.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnSearch {
    pub query_vector: Vec<f32>,
    pub k: usize,
    pub num_candidates: usize,
    pub from: usize,
    pub size: usize,
    pub source: SourceFilter,
    /// Boosted hierarchy terms. Only set when every level is known.
    pub boost: Option<CategoryHierarchy>,
}

impl KnnSearch {
    /// Nearest neighbours used for intent inference: hierarchy fields only, no boosts.
    pub fn intent_probe(query_vector: Vec<f32>) -> Self {
        Self {
            query_vector,
            k: INTENT_PROBE_K,
            num_candidates: KNN_NUM_CANDIDATES,
            from: 0,
            size: INTENT_PROBE_K,
            source: SourceFilter::Includes(
                HIERARCHY_FIELDS.iter().map(|f| f.to_string()).collect(),
            ),
            boost: None,
        }
    }

    /// Main retrieval: over-fetches `page_size + OVER_FETCH` hits starting at `offset`.
    ///
    /// Hierarchy boosts are attached only when all four levels of `hierarchy` are non-empty.
    pub fn main(
        query_vector: Vec<f32>,
        offset: usize,
        page_size: usize,
        hierarchy: &CategoryHierarchy,
    ) -> Self {
        Self {
            query_vector,
            k: KNN_K,
            num_candidates: KNN_NUM_CANDIDATES,
            from: offset,
            size: page_size.saturating_add(OVER_FETCH),
            source: SourceFilter::ExcludeEmbedding,
            boost: hierarchy.is_complete().then(|| hierarchy.clone()),
        }
    }

    /// Renders the Elasticsearch request body.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "_source": self.source.to_json(),
            "size": self.size,
            "from": self.from,
            "knn": {
                "field": EMBEDDING_FIELD,
                "query_vector": self.query_vector,
                "k": self.k,
                "num_candidates": self.num_candidates,
            },
        });

        if let Some(hierarchy) = &self.boost {
            body["query"] = boost_query(hierarchy);
        }

        body
    }
}

fn boost_query(hierarchy: &CategoryHierarchy) -> Value {
    let should: Vec<Value> = HIERARCHY_FIELDS
        .iter()
        .zip(hierarchy.levels())
        .zip(HIERARCHY_BOOSTS)
        .map(|((field, value), boost)| {
            json!({ "term": { *field: { "value": value, "boost": boost } } })
        })
        .collect();

    json!({
        "bool": {
            "should": should,
            "minimum_should_match": 0,
        }
    })
}

/// Fetches full records for `ids` (order is not guaranteed by the index).
pub fn ids_query(ids: &[String]) -> Value {
    json!({
        "_source": SourceFilter::ExcludeEmbedding.to_json(),
        "size": ids.len(),
        "query": { "terms": { PRODUCT_ID_FIELD: ids } },
    })
}

/// First `size` products of the index.
pub fn browse_query(size: usize) -> Value {
    json!({
        "_source": SourceFilter::ExcludeEmbedding.to_json(),
        "size": size,
        "query": { "match_all": {} },
    })
}

/// Top-level categories with product counts.
pub fn categories_query() -> Value {
    json!({
        "size": 0,
        "aggs": {
            CATEGORIES_AGG: {
                "terms": { "field": HIERARCHY_FIELDS[0], "size": CATEGORY_AGG_SIZE }
            }
        }
    })
}
