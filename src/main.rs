//! Aisle HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use aisle::cache::{CacheStore, ElasticCacheStore, MemoryCacheStore};
use aisle::config::{CacheBackend, Config};
use aisle::dispatch::{InFlightSet, RerankDispatcher, RerankWorkerPool};
use aisle::elastic::ElasticClient;
use aisle::embedding::{EmbedderConfig, SentenceEmbedder};
use aisle::gateway::{HandlerState, create_router_with_state, health_check, health_check_url};
use aisle::rerank::{LlmReranker, PassthroughReranker, RerankEngine};
use aisle::retrieval::ElasticRetrieval;
use aisle::search::SearchOrchestrator;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        inventory_index = %config.inventory_index,
        cache_backend = ?config.cache_backend,
        "Aisle starting"
    );

    let client = ElasticClient::new(&config.elastic_config())?;
    if let Err(e) = client.ping().await {
        tracing::warn!(error = %e, url = %client.url(), "search index not reachable yet");
    }

    let retrieval = Arc::new(ElasticRetrieval::new(
        client.clone(),
        config.inventory_index.clone(),
    ));

    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Elastic => Arc::new(ElasticCacheStore::new(
            client.clone(),
            config.cache_index.clone(),
        )),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::with_capacity(config.cache_capacity)),
    };

    let embedder_config = match &config.model_path {
        Some(path) => EmbedderConfig::new(path.clone()),
        None => {
            tracing::warn!("No AISLE_MODEL_PATH configured, running embedder in stub mode");
            EmbedderConfig::stub()
        }
    };
    let embedder = tokio::task::spawn_blocking(move || SentenceEmbedder::load(embedder_config))
        .await??;
    let embedder_is_stub = embedder.is_stub();

    let reranker: Arc<dyn RerankEngine> = if config.mock_provider {
        tracing::info!("Mock provider enabled, reranking keeps retrieval order");
        Arc::new(PassthroughReranker)
    } else {
        Arc::new(LlmReranker::new(config.rerank_model.clone()))
    };

    let dispatch = &config.dispatch;
    let (dispatcher, receiver) =
        RerankDispatcher::channel(dispatch.queue_capacity, InFlightSet::new(), cache.clone());
    let workers =
        RerankWorkerPool::spawn(receiver, reranker, dispatch.workers, dispatch.rerank_timeout);
    tracing::info!(
        workers = workers.len(),
        queue_capacity = dispatch.queue_capacity,
        timeout_secs = dispatch.rerank_timeout.as_secs(),
        "Rerank workers started"
    );

    let orchestrator = SearchOrchestrator::new(Arc::new(embedder), retrieval, cache, dispatcher);
    let state = HandlerState::new(Arc::new(orchestrator), embedder_is_stub);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last dispatcher, so the queue is closed and workers drain it.
    let drain = dispatch.rerank_timeout;
    if tokio::time::timeout(drain, workers.join()).await.is_err() {
        tracing::warn!(
            timeout_secs = drain.as_secs(),
            "Rerank queue not drained in time, dropping remaining jobs"
        );
    }

    tracing::info!("Aisle shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("AISLE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    if health_check(&health_check_url(port)).await {
        0
    } else {
        1
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
