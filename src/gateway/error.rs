use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::cache::AISLE_STATUS_HEADER;
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, aisle_status) = match &self {
            GatewayError::InvalidRequest(_)
            | GatewayError::Search(SearchError::InvalidRequest { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            GatewayError::Search(SearchError::Retrieval(e)) => {
                error!(error = %e, "retrieval failed");
                (StatusCode::BAD_GATEWAY, "retrieval_error")
            }
            GatewayError::Search(SearchError::Embedding(e)) => {
                error!(error = %e, "embedding failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(AISLE_STATUS_HEADER, HeaderValue::from_static(aisle_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
