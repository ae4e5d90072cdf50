use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::dispatcher::RerankReceiver;
use super::job::RerankJob;
use crate::cache::CacheEntry;
use crate::query::DedupKey;
use crate::rerank::{RerankEngine, RerankError, RerankOutcome};

/// What happened to one processed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub key: DedupKey,
    pub outcome: RerankOutcome,
    /// `false` when the cache write failed.
    pub stored: bool,
}

/// Background tasks draining the rerank queue.
///
/// Workers share one receiver; each takes the next job, reranks it and writes the resulting
/// order to the job's cache store. They exit once the queue is closed and empty.
pub struct RerankWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl RerankWorkerPool {
    pub fn spawn(
        receiver: RerankReceiver,
        engine: Arc<dyn RerankEngine>,
        workers: usize,
        timeout: Duration,
    ) -> Self {
        let receiver = Arc::new(Mutex::new(receiver));
        let handles = (0..workers.max(1))
            .map(|id| {
                let receiver = receiver.clone();
                let engine = engine.clone();
                tokio::spawn(
                    run_worker(receiver, engine, timeout)
                        .instrument(info_span!("rerank_worker", worker = id)),
                )
            })
            .collect();

        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker to exit. Workers exit after the last dispatcher is dropped and
    /// the queue has drained.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "rerank worker terminated abnormally");
            }
        }
    }

    /// Stops the workers without draining the queue. Queued jobs are dropped.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn run_worker(
    receiver: Arc<Mutex<RerankReceiver>>,
    engine: Arc<dyn RerankEngine>,
    timeout: Duration,
) {
    debug!("rerank worker started");
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };
        process_job(job, engine.clone(), timeout).await;
    }
    info!("rerank worker stopped");
}

/// Reranks one job and writes the resulting order to its cache store.
///
/// Engine failures, timeouts and panics fall back to the retrieval order. The job's key is
/// released when this returns.
pub async fn process_job(
    job: RerankJob,
    engine: Arc<dyn RerankEngine>,
    timeout: Duration,
) -> JobReport {
    let started = Instant::now();
    let key = job.key().clone();
    let span = info_span!("rerank_job", key = %key, candidates = job.candidates().len());

    async move {
        debug!(
            queued_ms = job.enqueued_at().elapsed().as_millis() as u64,
            "rerank job started"
        );

        let result = rerank_isolated(&job, engine, timeout).await;
        let outcome = RerankOutcome::resolve(result, job.candidates());
        if let RerankOutcome::Fallback { reason, .. } = &outcome {
            warn!(reason = %reason, "rerank failed, caching retrieval order");
        }

        let entry = CacheEntry::new(key.clone(), outcome.ids().to_vec());
        let stored = match job.cache().put(&entry).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to store reranked order");
                false
            }
        };

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            fallback = outcome.is_fallback(),
            stored,
            "rerank job finished"
        );
        drop(job);

        JobReport {
            key,
            outcome,
            stored,
        }
    }
    .instrument(span)
    .await
}

/// Runs the engine in its own task so a panic cannot take the worker down, bounded by `timeout`.
async fn rerank_isolated(
    job: &RerankJob,
    engine: Arc<dyn RerankEngine>,
    timeout: Duration,
) -> Result<Vec<String>, RerankError> {
    let query = job.key().query().as_str().to_string();
    let candidates = job.candidates().to_vec();
    let mut task = tokio::spawn(async move { engine.rerank(&query, &candidates).await });

    match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            error!(error = %join_error, "rerank engine task failed");
            Err(RerankError::Panicked {
                reason: join_error.to_string(),
            })
        }
        Err(_) => {
            task.abort();
            Err(RerankError::Timeout {
                secs: timeout.as_secs(),
            })
        }
    }
}
