use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const ALL_VARS: &[&str] = &[
    "AISLE_PORT",
    "AISLE_BIND_ADDR",
    "AISLE_ELASTICSEARCH_URL",
    "AISLE_ELASTICSEARCH_USER",
    "AISLE_ELASTICSEARCH_PASSWORD",
    "AISLE_ELASTICSEARCH_INSECURE",
    "AISLE_INVENTORY_INDEX",
    "AISLE_CACHE_INDEX",
    "AISLE_CACHE_BACKEND",
    "AISLE_CACHE_CAPACITY",
    "AISLE_MODEL_PATH",
    "AISLE_RERANK_MODEL",
    "AISLE_MOCK_PROVIDER",
    "AISLE_RERANK_QUEUE_CAPACITY",
    "AISLE_RERANK_WORKERS",
    "AISLE_RERANK_TIMEOUT_SECS",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_aisle_env();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_aisle_env();
    result
}

fn clear_aisle_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.elasticsearch_url, "http://localhost:9200");
    assert_eq!(config.inventory_index, "flipkart_products");
    assert_eq!(config.cache_index, "cached_search_results");
    assert_eq!(config.cache_backend, CacheBackend::Elastic);
    assert_eq!(config.rerank_model, "gpt-5-mini");
    assert!(config.model_path.is_none());
    assert!(!config.mock_provider);
    assert_eq!(config.dispatch.queue_capacity, 1000);
    assert_eq!(config.dispatch.workers, 1);
    assert_eq!(config.dispatch.rerank_timeout, Duration::from_secs(60));
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: "0.0.0.0".parse().expect("ip"),
        ..Config::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    let config = with_env_vars(&[], Config::from_env).expect("config");

    assert_eq!(config.port, 8080);
    assert_eq!(config.cache_backend, CacheBackend::Elastic);
    assert!(config.elasticsearch_user.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("AISLE_PORT", "9090"),
            ("AISLE_BIND_ADDR", "::1"),
            ("AISLE_ELASTICSEARCH_URL", "https://es.internal:9200"),
            ("AISLE_ELASTICSEARCH_USER", "elastic"),
            ("AISLE_ELASTICSEARCH_PASSWORD", "changeme"),
            ("AISLE_ELASTICSEARCH_INSECURE", "true"),
            ("AISLE_INVENTORY_INDEX", "products_v2"),
            ("AISLE_CACHE_INDEX", "rerank_cache"),
            ("AISLE_CACHE_BACKEND", "memory"),
            ("AISLE_CACHE_CAPACITY", "500"),
            ("AISLE_RERANK_MODEL", "gpt-4o-mini"),
            ("AISLE_MOCK_PROVIDER", "1"),
            ("AISLE_RERANK_QUEUE_CAPACITY", "64"),
            ("AISLE_RERANK_WORKERS", "4"),
            ("AISLE_RERANK_TIMEOUT_SECS", "15"),
        ],
        Config::from_env,
    )
    .expect("config");

    assert_eq!(config.port, 9090);
    assert_eq!(config.bind_addr, "::1".parse::<IpAddr>().expect("ip"));
    assert_eq!(config.elasticsearch_url, "https://es.internal:9200");
    assert_eq!(config.elasticsearch_user.as_deref(), Some("elastic"));
    assert!(config.elasticsearch_insecure);
    assert_eq!(config.inventory_index, "products_v2");
    assert_eq!(config.cache_index, "rerank_cache");
    assert_eq!(config.cache_backend, CacheBackend::Memory);
    assert_eq!(config.cache_capacity, 500);
    assert_eq!(config.rerank_model, "gpt-4o-mini");
    assert!(config.mock_provider);
    assert_eq!(config.dispatch.queue_capacity, 64);
    assert_eq!(config.dispatch.workers, 4);
    assert_eq!(config.dispatch.rerank_timeout, Duration::from_secs(15));
    assert!(config.validate().is_ok());

    let elastic = config.elastic_config();
    assert_eq!(elastic.username.as_deref(), Some("elastic"));
    assert_eq!(elastic.password.as_deref(), Some("changeme"));
    assert!(elastic.accept_invalid_certs);
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    let result = with_env_vars(&[("AISLE_PORT", "0")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    let result = with_env_vars(&[("AISLE_PORT", "http")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_invalid_port_too_large() {
    let result = with_env_vars(&[("AISLE_PORT", "70000")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    let result = with_env_vars(&[("AISLE_BIND_ADDR", "localhost")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
}

#[test]
#[serial]
fn test_unknown_cache_backend() {
    let result = with_env_vars(&[("AISLE_CACHE_BACKEND", "redis")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            name: "AISLE_CACHE_BACKEND",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_unparsable_numbers_fall_back_to_defaults() {
    let config = with_env_vars(
        &[
            ("AISLE_CACHE_CAPACITY", "lots"),
            ("AISLE_RERANK_WORKERS", "-2"),
            ("AISLE_RERANK_TIMEOUT_SECS", "1.5"),
        ],
        Config::from_env,
    )
    .expect("config");

    assert_eq!(config.cache_capacity, 10_000);
    assert_eq!(config.dispatch.workers, 1);
    assert_eq!(config.dispatch.rerank_timeout, Duration::from_secs(60));
}

#[test]
#[serial]
fn test_zero_values_rejected_by_validate() {
    for (var, name) in [
        ("AISLE_RERANK_QUEUE_CAPACITY", "AISLE_RERANK_QUEUE_CAPACITY"),
        ("AISLE_RERANK_WORKERS", "AISLE_RERANK_WORKERS"),
        ("AISLE_RERANK_TIMEOUT_SECS", "AISLE_RERANK_TIMEOUT_SECS"),
    ] {
        let config = with_env_vars(&[(var, "0")], Config::from_env).expect("config");
        match config.validate() {
            Err(ConfigError::ZeroValue { name: got }) => assert_eq!(got, name),
            other => panic!("expected ZeroValue for {}, got {:?}", var, other),
        }
    }
}

#[test]
fn test_memory_backend_requires_capacity() {
    let config = Config {
        cache_backend: CacheBackend::Memory,
        cache_capacity: 0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue { .. })
    ));

    let elastic = Config {
        cache_capacity: 0,
        ..Config::default()
    };
    assert!(elastic.validate().is_ok());
}

#[test]
fn test_credentials_must_be_paired() {
    let config = Config {
        elasticsearch_user: Some("elastic".to_string()),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::IncompleteCredentials)
    ));
    assert!(config.elastic_config().username.is_none());
}

#[test]
fn test_validate_model_path() {
    let missing = Config {
        model_path: Some(PathBuf::from("/nonexistent/model/dir")),
        ..Config::default()
    };
    assert!(matches!(
        missing.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));

    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("model.safetensors");
    std::fs::write(&file, b"x").expect("write");

    let not_dir = Config {
        model_path: Some(file),
        ..Config::default()
    };
    assert!(matches!(
        not_dir.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));

    let ok = Config {
        model_path: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    assert!(ok.validate().is_ok());
}

#[test]
#[serial]
fn test_mock_provider_flag_values() {
    for (value, expected) in [("1", true), ("yes", true), ("false", false), ("0", false)] {
        let config =
            with_env_vars(&[("AISLE_MOCK_PROVIDER", value)], Config::from_env).expect("config");
        assert_eq!(config.mock_provider, expected, "value {:?}", value);
    }
}

#[test]
fn test_cache_backend_from_str() {
    assert_eq!("Elastic".parse::<CacheBackend>().ok(), Some(CacheBackend::Elastic));
    assert_eq!(
        "elasticsearch".parse::<CacheBackend>().ok(),
        Some(CacheBackend::Elastic)
    );
    assert_eq!(" memory ".parse::<CacheBackend>().ok(), Some(CacheBackend::Memory));
    assert!("disk".parse::<CacheBackend>().is_err());
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::ZeroValue {
        name: "AISLE_RERANK_WORKERS",
    };
    assert_eq!(err.to_string(), "AISLE_RERANK_WORKERS must be greater than zero");

    let err = ConfigError::IncompleteCredentials;
    assert!(err.to_string().contains("user and password"));
}
