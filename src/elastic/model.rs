use serde::Deserialize;
use serde_json::Value;

use super::ElasticError;

/// `_search` response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub hits: Hits<T>,
    #[serde(default)]
    pub aggregations: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Hits<T> {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

impl<T> Default for Hits<T> {
    fn default() -> Self {
        Self {
            total: None,
            hits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

/// A single hit. `_source` is decoded as `T`.
#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f32>,
    #[serde(rename = "_source")]
    pub source: T,
}

/// `GET /{index}/_doc/{id}` response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GetResponse<T> {
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default = "Option::default")]
    pub source: Option<T>,
}

impl<T> GetResponse<T> {
    /// The stored source, or `None` when the document was not found.
    pub fn into_source(self) -> Option<T> {
        if self.found { self.source } else { None }
    }
}

/// One bucket of a `terms` aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermsBucket {
    pub key: String,
    pub doc_count: u64,
}

impl<T> SearchResponse<T> {
    /// Total hit count as reported by the cluster (falls back to the returned hit count).
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .map(|t| t.value)
            .unwrap_or(self.hits.hits.len() as u64)
    }

    /// Consumes the response and returns the decoded sources in rank order.
    pub fn into_sources(self) -> Vec<T> {
        self.hits.hits.into_iter().map(|h| h.source).collect()
    }

    /// Decodes the buckets of the `terms` aggregation called `name`.
    pub fn terms_buckets(&self, name: &str) -> Result<Vec<TermsBucket>, ElasticError> {
        let Some(buckets) = self
            .aggregations
            .as_ref()
            .and_then(|aggs| aggs.get(name))
            .and_then(|agg| agg.get("buckets"))
        else {
            return Ok(Vec::new());
        };

        serde_json::from_value(buckets.clone()).map_err(|e| ElasticError::Decode {
            url: format!("aggregations.{}", name),
            message: e.to_string(),
        })
    }
}
