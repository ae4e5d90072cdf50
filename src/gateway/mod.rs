//! HTTP gateway (Axum) over the search pipeline.
//!
//! This module is primarily used by the `aisle` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
};
use std::time::Duration;

use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{categories_handler, items_handler, recommendations_handler, search_handler};
pub use state::HandlerState;

use crate::cache::{
    AISLE_STATUS_HEADER, AISLE_STATUS_HEALTHY, AISLE_STATUS_NOT_READY, AISLE_STATUS_READY,
};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/search", get(search_handler))
        .route("/v1/recommendations", get(recommendations_handler))
        .route("/v1/categories", get(categories_handler))
        .route("/v1/items", get(items_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Liveness URL of a gateway listening locally on `port`.
pub fn health_check_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/healthz", port)
}

/// Sends one `GET` to `url`. Returns `true` only on a 2xx answer within one second.
pub async fn health_check(url: &str) -> bool {
    let Ok(client) = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
    else {
        return false;
    };

    match client.get(url).send().await {
        Ok(res) => res.status().is_success(),
        Err(e) => {
            tracing::debug!(error = %e, url = url, "health check failed");
            false
        }
    }
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub index: &'static str,
    pub rerank_queue: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        AISLE_STATUS_HEADER,
        HeaderValue::from_static(AISLE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let index_status = if state.orchestrator.is_ready().await {
        AISLE_STATUS_READY
    } else {
        AISLE_STATUS_NOT_READY
    };

    let queue_status = if state.orchestrator.dispatcher().is_closed() {
        AISLE_STATUS_NOT_READY
    } else {
        AISLE_STATUS_READY
    };

    let components = ComponentStatus {
        http: AISLE_STATUS_READY,
        index: index_status,
        rerank_queue: queue_status,
        embedder_mode: state.embedder_mode,
    };

    let is_ready =
        components.index == AISLE_STATUS_READY && components.rerank_queue == AISLE_STATUS_READY;

    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, AISLE_STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, AISLE_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(AISLE_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
