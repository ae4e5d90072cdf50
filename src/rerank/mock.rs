use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::error::{RerankError, RerankResult};
use super::RerankEngine;
use crate::retrieval::{CandidateResult, product_ids};

/// What [`MockReranker`] does with each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    /// Returns the candidate ids reversed.
    #[default]
    Reverse,
    /// Returns an error.
    Fail,
    /// Returns ids that are not a permutation of the candidates.
    Malformed,
    /// Panics inside the call.
    Panic,
    /// Never completes.
    Hang,
}

/// Instrumented [`RerankEngine`] for tests.
///
/// With a gate installed, every call waits for one permit from [`MockReranker::release`]
/// after signalling start, which lets tests hold jobs "in flight".
#[derive(Default)]
pub struct MockReranker {
    behavior: Mutex<MockBehavior>,
    gate: Option<Arc<Semaphore>>,
    started: AtomicUsize,
    finished: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockReranker {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            ..Default::default()
        }
    }

    /// Calls block until [`MockReranker::release`] hands out a permit.
    pub fn gated(behavior: MockBehavior) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new(behavior)
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// Lets `n` gated calls proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// `(query, candidate ids)` of every call, in start order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().clone()
    }
}

struct ActiveGuard<'a>(&'a MockReranker);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
        self.0.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RerankEngine for MockReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidateResult],
    ) -> RerankResult<Vec<String>> {
        self.calls
            .lock()
            .push((query.to_string(), product_ids(candidates)));
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        let _guard = ActiveGuard(self);

        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }

        let behavior = *self.behavior.lock();
        match behavior {
            MockBehavior::Reverse => Ok(product_ids(candidates).into_iter().rev().collect()),
            MockBehavior::Fail => Err(RerankError::Provider {
                reason: "mock provider failure".to_string(),
            }),
            MockBehavior::Malformed => {
                let mut ids = product_ids(candidates);
                ids.push("invented-id".to_string());
                Ok(ids)
            }
            MockBehavior::Panic => panic!("mock reranker panic"),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
        }
    }
}
