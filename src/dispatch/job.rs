use std::sync::Arc;
use std::time::Instant;

use super::inflight::InFlightGuard;
use crate::cache::CacheStore;
use crate::query::DedupKey;
use crate::retrieval::CandidateResult;

/// One unit of background rerank work.
///
/// Holds the in-flight membership of its key: the key is released when the job is dropped,
/// whether it was processed, failed, or rejected by the queue.
pub struct RerankJob {
    guard: InFlightGuard,
    candidates: Vec<CandidateResult>,
    cache: Arc<dyn CacheStore>,
    enqueued_at: Instant,
}

impl RerankJob {
    pub(crate) fn new(
        guard: InFlightGuard,
        candidates: Vec<CandidateResult>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            guard,
            candidates,
            cache,
            enqueued_at: Instant::now(),
        }
    }

    pub fn key(&self) -> &DedupKey {
        self.guard.key()
    }

    pub fn candidates(&self) -> &[CandidateResult] {
        &self.candidates
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }

    /// Drops the job without processing it, releasing its key.
    pub fn abandon(self) {
        drop(self);
    }
}

impl std::fmt::Debug for RerankJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerankJob")
            .field("key", self.key())
            .field("candidates", &self.candidates.len())
            .finish()
    }
}
