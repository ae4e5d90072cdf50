use std::time::Duration;

use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error::ElasticError;
use super::model::{GetResponse, SearchResponse};
use super::DEFAULT_ELASTICSEARCH_URL;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
/// Connection settings for [`ElasticClient`].
pub struct ElasticConfig {
    /// Cluster URL, e.g. `http://localhost:9200`.
    pub url: String,
    /// Basic auth user.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Accept self-signed / invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ELASTICSEARCH_URL.to_string(),
            username: None,
            password: None,
            accept_invalid_certs: false,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ElasticConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

#[derive(Clone)]
/// Minimal Elasticsearch JSON client.
pub struct ElasticClient {
    http: HttpClient,
    url: String,
    credentials: Option<(String, String)>,
}

impl std::fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticClient")
            .field("url", &self.url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl ElasticClient {
    /// Creates a client from `config`.
    pub fn new(config: &ElasticConfig) -> Result<Self, ElasticError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ElasticError::ClientBuild {
                url: config.url.clone(),
                message: e.to_string(),
            })?;

        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };

        Ok(Self {
            http,
            url: config.url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Returns the configured URL (without trailing slash).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic reachability check (`GET /`).
    pub async fn ping(&self) -> Result<(), ElasticError> {
        let url = format!("{}/", self.url);
        self.send(self.request(Method::GET, &url), &url).await?;
        Ok(())
    }

    /// Runs `body` against `index/_search` and decodes hits as `T`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<SearchResponse<T>, ElasticError> {
        let url = format!("{}/{}/_search", self.url, index);
        debug!(index = index, "Elasticsearch search");

        let response = self
            .send(self.request(Method::POST, &url).json(body), &url)
            .await?;

        response
            .json::<SearchResponse<T>>()
            .await
            .map_err(|e| ElasticError::Decode {
                url,
                message: e.to_string(),
            })
    }

    /// Fetches document `id` from `index` through the real-time get API.
    ///
    /// A missing document or a missing index yields `Ok(None)`.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<T>, ElasticError> {
        let url = format!("{}/{}/_doc/{}", self.url, index, id);
        debug!(index = index, id = id, "Elasticsearch get document");

        let response = match self.send(self.request(Method::GET, &url), &url).await {
            Ok(response) => response,
            Err(ElasticError::Status { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let document = response
            .json::<GetResponse<T>>()
            .await
            .map_err(|e| ElasticError::Decode {
                url,
                message: e.to_string(),
            })?;

        Ok(document.into_source())
    }

    /// Creates or replaces the document `id` in `index`.
    pub async fn put_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        document: &T,
    ) -> Result<(), ElasticError> {
        let url = format!("{}/{}/_doc/{}", self.url, index, id);
        debug!(index = index, id = id, "Elasticsearch put document");

        self.send(self.request(Method::PUT, &url).json(document), &url)
            .await?;
        Ok(())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ElasticError> {
        let response = builder.send().await.map_err(|e| ElasticError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        truncate_utf8(&mut body, MAX_ERROR_BODY);

        Err(ElasticError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

pub(super) fn truncate_utf8(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
