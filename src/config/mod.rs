//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `AISLE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::dispatch::DispatchConfig;
use crate::elastic::{
    DEFAULT_CACHE_INDEX, DEFAULT_ELASTICSEARCH_URL, DEFAULT_INVENTORY_INDEX, ElasticConfig,
};
use crate::rerank::DEFAULT_RERANK_MODEL;

/// Where reranked orderings are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Elasticsearch cache index, shared and persistent.
    #[default]
    Elastic,
    /// In-process bounded cache.
    Memory,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elastic" | "elasticsearch" => Ok(CacheBackend::Elastic),
            "memory" => Ok(CacheBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                name: Config::ENV_CACHE_BACKEND,
                value: s.to_string(),
            }),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `AISLE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Elasticsearch endpoint. Default: `http://localhost:9200`.
    pub elasticsearch_url: String,

    pub elasticsearch_user: Option<String>,

    pub elasticsearch_password: Option<String>,

    /// Accept invalid TLS certificates from the cluster.
    pub elasticsearch_insecure: bool,

    /// Product index. Default: `flipkart_products`.
    pub inventory_index: String,

    /// Rerank cache index. Default: `cached_search_results`.
    pub cache_index: String,

    pub cache_backend: CacheBackend,

    /// Max entries of the memory backend. Default: `10_000`.
    pub cache_capacity: u64,

    /// Sentence-embedding model directory. `None` runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Chat model used for reranking. Default: `gpt-5-mini`.
    pub rerank_model: String,

    /// Skip the chat provider and keep retrieval order.
    pub mock_provider: bool,

    pub dispatch: DispatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            elasticsearch_url: DEFAULT_ELASTICSEARCH_URL.to_string(),
            elasticsearch_user: None,
            elasticsearch_password: None,
            elasticsearch_insecure: false,
            inventory_index: DEFAULT_INVENTORY_INDEX.to_string(),
            cache_index: DEFAULT_CACHE_INDEX.to_string(),
            cache_backend: CacheBackend::default(),
            cache_capacity: 10_000,
            model_path: None,
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            mock_provider: false,
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "AISLE_PORT";
    const ENV_BIND_ADDR: &'static str = "AISLE_BIND_ADDR";
    const ENV_ELASTICSEARCH_URL: &'static str = "AISLE_ELASTICSEARCH_URL";
    const ENV_ELASTICSEARCH_USER: &'static str = "AISLE_ELASTICSEARCH_USER";
    const ENV_ELASTICSEARCH_PASSWORD: &'static str = "AISLE_ELASTICSEARCH_PASSWORD";
    const ENV_ELASTICSEARCH_INSECURE: &'static str = "AISLE_ELASTICSEARCH_INSECURE";
    const ENV_INVENTORY_INDEX: &'static str = "AISLE_INVENTORY_INDEX";
    const ENV_CACHE_INDEX: &'static str = "AISLE_CACHE_INDEX";
    const ENV_CACHE_BACKEND: &'static str = "AISLE_CACHE_BACKEND";
    const ENV_CACHE_CAPACITY: &'static str = "AISLE_CACHE_CAPACITY";
    const ENV_MODEL_PATH: &'static str = "AISLE_MODEL_PATH";
    const ENV_RERANK_MODEL: &'static str = "AISLE_RERANK_MODEL";
    const ENV_MOCK_PROVIDER: &'static str = "AISLE_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let cache_backend = match optional_string(Self::ENV_CACHE_BACKEND) {
            Some(value) => value.parse()?,
            None => defaults.cache_backend,
        };

        Ok(Self {
            port,
            bind_addr,
            elasticsearch_url: string_or(Self::ENV_ELASTICSEARCH_URL, defaults.elasticsearch_url),
            elasticsearch_user: optional_string(Self::ENV_ELASTICSEARCH_USER),
            elasticsearch_password: optional_string(Self::ENV_ELASTICSEARCH_PASSWORD),
            elasticsearch_insecure: flag(Self::ENV_ELASTICSEARCH_INSECURE),
            inventory_index: string_or(Self::ENV_INVENTORY_INDEX, defaults.inventory_index),
            cache_index: string_or(Self::ENV_CACHE_INDEX, defaults.cache_index),
            cache_backend,
            cache_capacity: parse_or(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity),
            model_path: optional_string(Self::ENV_MODEL_PATH).map(PathBuf::from),
            rerank_model: string_or(Self::ENV_RERANK_MODEL, defaults.rerank_model),
            mock_provider: flag(Self::ENV_MOCK_PROVIDER),
            dispatch: DispatchConfig::from_env(),
        })
    }

    /// Validates paths and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elasticsearch_user.is_some() != self.elasticsearch_password.is_some() {
            return Err(ConfigError::IncompleteCredentials);
        }

        if self.cache_backend == CacheBackend::Memory && self.cache_capacity == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_CACHE_CAPACITY,
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        self.dispatch.validate()
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Connection settings for the Elasticsearch client.
    pub fn elastic_config(&self) -> ElasticConfig {
        let config = ElasticConfig::new(self.elasticsearch_url.clone())
            .accept_invalid_certs(self.elasticsearch_insecure);
        match (&self.elasticsearch_user, &self.elasticsearch_password) {
            (Some(user), Some(password)) => config.with_basic_auth(user, password),
            _ => config,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}

/// Trimmed, non-empty value of `var_name`.
pub(crate) fn optional_string(var_name: &str) -> Option<String> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn string_or(var_name: &str, default: String) -> String {
    optional_string(var_name).unwrap_or(default)
}

/// Parsed value of `var_name`; unset or unparsable values yield `default`.
pub(crate) fn parse_or<T: FromStr>(var_name: &str, default: T) -> T {
    optional_string(var_name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Any non-empty value other than `0`/`false`/`no` enables the flag.
pub(crate) fn flag(var_name: &str) -> bool {
    optional_string(var_name)
        .is_some_and(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
}
