//! Query normalization and the identities derived from it.
//!
//! A [`NormalizedQuery`] is the unit of cache and dedup identity: two raw inputs that normalize to
//! the same text are the same query. [`QueryType`] partitions that namespace, and the pair forms
//! a [`DedupKey`].


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trimmed, lowercased query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    /// Normalizes `raw` (see [`normalize`]).
    #[inline]
    pub fn new(raw: &str) -> Self {
        normalize(raw)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalizes raw query text: trims surrounding whitespace and lowercases.
///
/// Deterministic and idempotent: `normalize(normalize(x).as_str()) == normalize(x)`.
pub fn normalize(raw: &str) -> NormalizedQuery {
    NormalizedQuery(raw.trim().to_lowercase())
}

/// Tag that partitions the cache and dedup namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Search,
    Recommendations,
}

impl QueryType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Search => "search",
            QueryType::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "recommendations" | "recommendation" => Ok(Self::Recommendations),
            other => Err(format!("unknown query type: {}", other)),
        }
    }
}

/// Identity of a rerank job and of its cache entry: `(normalized query, query type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    query: NormalizedQuery,
    query_type: QueryType,
}

impl DedupKey {
    pub fn new(query: NormalizedQuery, query_type: QueryType) -> Self {
        Self { query, query_type }
    }

    /// Normalizes `raw` and pairs it with `query_type`.
    pub fn from_raw(raw: &str, query_type: QueryType) -> Self {
        Self::new(normalize(raw), query_type)
    }

    #[inline]
    pub fn query(&self) -> &NormalizedQuery {
        &self.query
    }

    #[inline]
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.query_type, self.query)
    }
}
