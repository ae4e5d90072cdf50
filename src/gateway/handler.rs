use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cache::{AISLE_STATUS_HEADER, SearchStatus};
use crate::constants::{
    DEFAULT_BROWSE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_RECOMMENDATIONS, MAX_PAGE_SIZE,
};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::query::QueryType;
use crate::retrieval::{CandidateResult, CategoryCount};
use crate::search::{SearchRequest, SearchResponse};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_page_size")]
    pub size: usize,
    #[serde(default, rename = "type")]
    pub query_type: QueryType,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub name: String,
    pub product_id: String,
    #[serde(default = "default_recommendations")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct ItemsParams {
    #[serde(default = "default_browse_size")]
    pub size: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub query: String,
    pub status: SearchStatus,
    pub count: usize,
    pub items: Vec<CandidateResult>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesBody {
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
pub struct ItemsBody {
    pub count: usize,
    pub items: Vec<CandidateResult>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

fn default_browse_size() -> usize {
    DEFAULT_BROWSE_SIZE
}

/// Rejects sizes outside `1..=MAX_PAGE_SIZE`.
pub fn validate_size(name: &str, size: usize) -> Result<(), GatewayError> {
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(GatewayError::InvalidRequest(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_PAGE_SIZE, size
        )));
    }
    Ok(())
}

fn require_text(name: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}

#[instrument(skip(state, params), fields(query = %params.q, query_type = %params.query_type))]
pub async fn search_handler(
    State(state): State<HandlerState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, GatewayError> {
    require_text("q", &params.q)?;
    validate_size("size", params.size)?;

    let request = SearchRequest::new(params.q.as_str())
        .with_offset(params.offset)
        .with_size(params.size)
        .with_type(params.query_type);

    let response = state.orchestrator.search(&request).await?;
    Ok(make_response(params.q, response))
}

#[instrument(skip(state, params), fields(product_id = %params.product_id))]
pub async fn recommendations_handler(
    State(state): State<HandlerState>,
    Query(params): Query<RecommendationParams>,
) -> Result<Response, GatewayError> {
    require_text("name", &params.name)?;
    validate_size("limit", params.limit)?;

    let response = state
        .orchestrator
        .recommend(&params.name, &params.product_id, params.limit)
        .await?;
    Ok(make_response(params.name, response))
}

#[instrument(skip(state))]
pub async fn categories_handler(
    State(state): State<HandlerState>,
) -> Result<Json<CategoriesBody>, GatewayError> {
    let categories = state.orchestrator.categories().await?;
    debug!(categories = categories.len(), "listed categories");
    Ok(Json(CategoriesBody { categories }))
}

#[instrument(skip(state, params), fields(size = params.size))]
pub async fn items_handler(
    State(state): State<HandlerState>,
    Query(params): Query<ItemsParams>,
) -> Result<Json<ItemsBody>, GatewayError> {
    validate_size("size", params.size)?;

    let items = state.orchestrator.browse(params.size).await?;
    Ok(Json(ItemsBody {
        count: items.len(),
        items,
    }))
}

/// JSON body plus the `X-Aisle-Status` header for a search result.
pub fn make_response(query: String, response: SearchResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        AISLE_STATUS_HEADER,
        HeaderValue::from_static(response.status.as_header_value()),
    );

    let body = SearchBody {
        query,
        status: response.status,
        count: response.items.len(),
        items: response.items,
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}
