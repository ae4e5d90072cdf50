use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, instrument, warn};

use super::inflight::InFlightSet;
use super::job::RerankJob;
use crate::cache::CacheStore;
use crate::query::DedupKey;
use crate::retrieval::CandidateResult;

/// Receiving side of the rerank queue, consumed by the worker pool.
pub type RerankReceiver = mpsc::Receiver<RerankJob>;

/// Result of a dispatch attempt. None of them is an error for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The job was queued.
    Enqueued,
    /// A job for the same key is already queued or running.
    AlreadyInFlight,
    /// The queue is at capacity; the job was dropped and its key released.
    QueueFull,
    /// The workers are gone; the job was dropped and its key released.
    Closed,
}

impl DispatchOutcome {
    #[inline]
    pub fn is_enqueued(&self) -> bool {
        matches!(self, DispatchOutcome::Enqueued)
    }
}

/// Request-side handle of the rerank queue.
///
/// Never blocks: membership is checked and taken under the in-flight lock, then the job is
/// offered to the bounded queue with `try_send`. Clones share the queue; the queue closes when
/// every clone is dropped.
#[derive(Clone)]
pub struct RerankDispatcher {
    sender: mpsc::Sender<RerankJob>,
    in_flight: InFlightSet,
    cache: Arc<dyn CacheStore>,
}

impl RerankDispatcher {
    /// Creates a dispatcher with a queue of `capacity` jobs and returns the receiving side.
    pub fn channel(
        capacity: usize,
        in_flight: InFlightSet,
        cache: Arc<dyn CacheStore>,
    ) -> (Self, RerankReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                in_flight,
                cache,
            },
            receiver,
        )
    }

    #[instrument(
        skip(self, key, candidates),
        fields(key = %key, candidates = candidates.len())
    )]
    pub fn dispatch(&self, key: DedupKey, candidates: Vec<CandidateResult>) -> DispatchOutcome {
        let Some(guard) = self.in_flight.acquire(key) else {
            debug!("rerank already in flight");
            return DispatchOutcome::AlreadyInFlight;
        };

        let job = RerankJob::new(guard, candidates, self.cache.clone());
        match self.sender.try_send(job) {
            Ok(()) => {
                debug!("rerank job enqueued");
                DispatchOutcome::Enqueued
            }
            Err(TrySendError::Full(job)) => {
                warn!(capacity = self.capacity(), "rerank queue full, dropping job");
                job.abandon();
                DispatchOutcome::QueueFull
            }
            Err(TrySendError::Closed(job)) => {
                warn!("rerank queue closed, dropping job");
                job.abandon();
                DispatchOutcome::Closed
            }
        }
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    /// Queue capacity in jobs.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Jobs currently waiting in the queue.
    pub fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for RerankDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerankDispatcher")
            .field("capacity", &self.capacity())
            .field("queued", &self.queued())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
