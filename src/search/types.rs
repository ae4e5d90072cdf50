use crate::cache::SearchStatus;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::dispatch::DispatchOutcome;
use crate::query::QueryType;
use crate::retrieval::CandidateResult;

/// One page of search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text, normalized by the orchestrator.
    pub query: String,
    pub offset: usize,
    /// Maximum number of items returned.
    pub size: usize,
    pub query_type: QueryType,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
            query_type: QueryType::Search,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }
}

/// Items for a request and how they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<CandidateResult>,
    pub status: SearchStatus,
    /// Outcome of the background rerank hand-off. `None` on cache hits and empty results.
    pub dispatch: Option<DispatchOutcome>,
}
