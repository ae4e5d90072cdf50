//! HTTP client helpers for tests.

use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub aisle_status: String,
    pub body: Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<TestResponse, reqwest::Error> {
        let resp = self.client.get(self.url(path)).send().await?;
        read_response(resp).await
    }

    pub async fn search(&self, query: &str, size: usize) -> Result<TestResponse, reqwest::Error> {
        let resp = self
            .client
            .get(self.url("/v1/search"))
            .query(&[("q", query.to_string()), ("size", size.to_string())])
            .send()
            .await?;
        read_response(resp).await
    }
}

async fn read_response(resp: reqwest::Response) -> Result<TestResponse, reqwest::Error> {
    let status = resp.status().as_u16();
    let aisle_status = resp
        .headers()
        .get("x-aisle-status")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let body = resp.json().await.unwrap_or(Value::Null);

    Ok(TestResponse {
        status,
        aisle_status,
        body,
    })
}

/// Product ids of the `items` array in a search body.
pub fn item_ids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["product_id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
