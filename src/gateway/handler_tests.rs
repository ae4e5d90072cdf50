//! Tests for the gateway router and handlers.

use axum::{Router, body::Body, http::Request, http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use crate::cache::{AISLE_STATUS_HEADER, MockCacheStore};
use crate::dispatch::{InFlightSet, RerankDispatcher, RerankReceiver};
use crate::embedding::SentenceEmbedder;
use crate::gateway::create_router_with_state;
use crate::gateway::error::GatewayError;
use crate::gateway::handler::validate_size;
use crate::gateway::state::HandlerState;
use crate::query::{DedupKey, QueryType};
use crate::retrieval::{CandidateResult, CategoryHierarchy, MockRetrieval};
use crate::search::{SearchError, SearchOrchestrator};

struct TestApp {
    router: Router,
    retrieval: Arc<MockRetrieval>,
    cache: Arc<MockCacheStore>,
    receiver: RerankReceiver,
}

fn test_app(products: usize) -> TestApp {
    let retrieval = Arc::new(MockRetrieval::with_numbered_products(products));
    let cache = Arc::new(MockCacheStore::new());
    let (dispatcher, receiver) = RerankDispatcher::channel(16, InFlightSet::new(), cache.clone());

    let orchestrator = SearchOrchestrator::new(
        Arc::new(SentenceEmbedder::stub()),
        retrieval.clone(),
        cache.clone(),
        dispatcher,
    );
    let state = HandlerState::new(Arc::new(orchestrator), true);

    TestApp {
        router: create_router_with_state(state),
        retrieval,
        cache,
        receiver,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let status = response.status();
    let header = response
        .headers()
        .get(AISLE_STATUS_HEADER)
        .map(|v| v.to_str().expect("ascii header").to_string());
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, header, json)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_healthz() {
        let app = test_app(0);
        let (status, header, body) = get(&app.router, "/healthz").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some("healthy"));
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_components() {
        let app = test_app(1);
        let (status, _, body) = get(&app.router, "/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["components"]["index"], "ready");
        assert_eq!(body["components"]["embedder_mode"], "stub");
    }

    #[tokio::test]
    async fn test_ready_unavailable_when_index_down() {
        let app = test_app(1);
        app.retrieval.set_fail(true);

        let (status, header, body) = get(&app.router, "/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(header.as_deref(), Some("not_ready"));
        assert_eq!(body["components"]["index"], "not_ready");
    }

    #[tokio::test]
    async fn test_ready_unavailable_when_queue_closed() {
        let app = test_app(1);
        drop(app.receiver);

        let (status, _, body) = get(&app.router, "/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["components"]["rerank_queue"], "not_ready");
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_miss() {
        let mut app = test_app(60);
        let (status, header, body) = get(&app.router, "/v1/search?q=Red%20Shoes&size=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some("MISS"));
        assert_eq!(body["status"], "MISS");
        assert_eq!(body["count"], 10);
        assert_eq!(body["items"][0]["product_id"], "P0");

        let job = app.receiver.try_recv().expect("rerank job");
        assert_eq!(job.key(), &DedupKey::from_raw("red shoes", QueryType::Search));
        assert_eq!(job.candidates().len(), 40);
    }

    #[tokio::test]
    async fn test_search_hit() {
        let app = test_app(10);
        app.cache.insert(
            DedupKey::from_raw("red shoes", QueryType::Search),
            vec!["P4".to_string(), "P2".to_string()],
        );

        let (status, header, body) = get(&app.router, "/v1/search?q=red+shoes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some("HIT_CACHE"));
        assert_eq!(body["items"][0]["product_id"], "P4");
        assert_eq!(body["items"][1]["product_id"], "P2");
        assert!(app.retrieval.knn_requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_type_parameter() {
        let mut app = test_app(10);
        let (status, _, _) = get(&app.router, "/v1/search?q=watch&type=recommendations").await;

        assert_eq!(status, StatusCode::OK);
        let job = app.receiver.try_recv().expect("rerank job");
        assert_eq!(job.key().query_type(), QueryType::Recommendations);
    }

    #[tokio::test]
    async fn test_search_rejects_bad_sizes() {
        let app = test_app(10);

        for uri in ["/v1/search?q=x&size=0", "/v1/search?q=x&size=101"] {
            let (status, header, body) = get(&app.router, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(header.as_deref(), Some("invalid_request"));
            assert_eq!(body["code"], 400);
        }
        assert_eq!(app.retrieval.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let app = test_app(10);
        let (status, _, _) = get(&app.router, "/v1/search?q=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_retrieval_failure_is_bad_gateway() {
        let app = test_app(10);
        app.retrieval.set_fail(true);

        let (status, header, body) = get(&app.router, "/v1/search?q=shoes").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(header.as_deref(), Some("retrieval_error"));
        assert_eq!(body["code"], 502);
        assert!(body["error"].as_str().expect("message").contains("retrieval"));
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn test_recommendations_exclude_source() {
        let app = test_app(20);
        let (status, header, body) = get(
            &app.router,
            "/v1/recommendations?name=Product%200&product_id=P0&limit=3",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some("MISS"));
        let ids: Vec<&str> = body["items"]
            .as_array()
            .expect("items")
            .iter()
            .map(|item| item["product_id"].as_str().expect("id"))
            .collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
    }

    #[tokio::test]
    async fn test_recommendations_require_params() {
        let app = test_app(5);
        let (status, _, _) = get(&app.router, "/v1/recommendations?name=x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories() {
        let app = test_app(0);
        app.retrieval.set_products(vec![
            CandidateResult::new("1", "a")
                .with_hierarchy(CategoryHierarchy::new("Watches", "Men", "", "")),
            CandidateResult::new("2", "b")
                .with_hierarchy(CategoryHierarchy::new("Watches", "Women", "", "")),
        ]);

        let (status, _, body) = get(&app.router, "/v1/categories").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"][0]["category"], "Watches");
        assert_eq!(body["categories"][0]["product_count"], 2);
    }

    #[tokio::test]
    async fn test_items_default_size() {
        let app = test_app(40);
        let (status, _, body) = get(&app.router, "/v1/items").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 15);
    }
}

mod errors {
    use super::*;
    use crate::embedding::EmbeddingError;
    use crate::retrieval::RetrievalError;

    #[test]
    fn test_validate_size_bounds() {
        assert!(validate_size("size", 1).is_ok());
        assert!(validate_size("size", 100).is_ok());
        assert!(validate_size("size", 0).is_err());
        assert!(validate_size("size", 101).is_err());
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                GatewayError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::from(SearchError::InvalidRequest {
                    reason: "empty".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::from(SearchError::Retrieval(RetrievalError::Unavailable {
                    reason: "down".to_string(),
                })),
                StatusCode::BAD_GATEWAY,
            ),
            (
                GatewayError::from(SearchError::Embedding(EmbeddingError::InferenceFailed {
                    reason: "boom".to_string(),
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
            assert!(response.headers().contains_key(AISLE_STATUS_HEADER));
        }
    }
}
