//! In-process pipeline and test server harness.

use aisle::cache::{CacheStore, MockCacheStore};
use aisle::dispatch::{InFlightSet, RerankDispatcher, RerankWorkerPool};
use aisle::embedding::SentenceEmbedder;
use aisle::gateway::{HandlerState, create_router_with_state};
use aisle::rerank::{MockBehavior, MockReranker};
use aisle::retrieval::MockRetrieval;
use aisle::search::SearchOrchestrator;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 20;
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub products: usize,
    pub behavior: MockBehavior,
    pub gated: bool,
    pub queue_capacity: usize,
    pub workers: usize,
    pub rerank_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            products: 60,
            behavior: MockBehavior::Reverse,
            gated: false,
            queue_capacity: 32,
            workers: 1,
            rerank_timeout: Duration::from_secs(5),
        }
    }
}

impl PipelineConfig {
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn rerank_timeout(mut self, timeout: Duration) -> Self {
        self.rerank_timeout = timeout;
        self
    }
}

/// A full pipeline over mocks: orchestrator, dispatcher and running workers.
pub struct Pipeline {
    pub orchestrator: Arc<SearchOrchestrator>,
    pub retrieval: Arc<MockRetrieval>,
    pub cache: Arc<MockCacheStore>,
    pub reranker: Arc<MockReranker>,
    pub in_flight: InFlightSet,
    pub workers: RerankWorkerPool,
}

impl Pipeline {
    pub fn start(config: PipelineConfig) -> Self {
        let retrieval = Arc::new(MockRetrieval::with_numbered_products(config.products));
        let cache = Arc::new(MockCacheStore::new());
        let reranker = Arc::new(if config.gated {
            MockReranker::gated(config.behavior)
        } else {
            MockReranker::new(config.behavior)
        });
        let in_flight = InFlightSet::new();

        let store: Arc<dyn CacheStore> = cache.clone();
        let (dispatcher, receiver) =
            RerankDispatcher::channel(config.queue_capacity, in_flight.clone(), store.clone());
        let workers = RerankWorkerPool::spawn(
            receiver,
            reranker.clone(),
            config.workers,
            config.rerank_timeout,
        );

        let orchestrator = SearchOrchestrator::new(
            Arc::new(SentenceEmbedder::stub()),
            retrieval.clone(),
            store,
            dispatcher,
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            retrieval,
            cache,
            reranker,
            in_flight,
            workers,
        }
    }

    /// Drops the request side and waits for the workers to drain the queue.
    pub async fn shutdown(self) {
        drop(self.orchestrator);
        tokio::time::timeout(WAIT_TIMEOUT, self.workers.join())
            .await
            .expect("workers drain in time");
    }
}

/// Polls `condition` until it holds, panicking after a few seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub retrieval: Arc<MockRetrieval>,
    pub cache: Arc<MockCacheStore>,
    pub reranker: Arc<MockReranker>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => tokio::time::sleep(interval).await,
        }
    }
}

/// Spawns the HTTP gateway over a mocked pipeline on an ephemeral port.
///
/// The index is a [`MockRetrieval`], the cache a [`MockCacheStore`], the embedder runs in stub
/// mode and reranking uses a [`MockReranker`].
pub async fn spawn_test_server(config: PipelineConfig) -> Result<TestServer, ServerStartupError> {
    let pipeline = Pipeline::start(config);
    let Pipeline {
        orchestrator,
        retrieval,
        cache,
        reranker,
        workers,
        ..
    } = pipeline;

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let app = create_router_with_state(HandlerState::new(orchestrator, true));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        workers.join().await;
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr,
        retrieval,
        cache,
        reranker,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
