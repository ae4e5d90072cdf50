//! Background rerank dispatch.
//!
//! The request path hands over candidates with [`RerankDispatcher::dispatch`] and returns
//! immediately. A [`RerankWorkerPool`] consumes the bounded queue, reranks and fills the cache.
//!
//! At most one job per [`crate::query::DedupKey`] is queued or running at any time. The
//! [`InFlightSet`] grants membership at dispatch and each [`RerankJob`] owns the guard that
//! gives it back, so the key is released on every exit path: success, failure, timeout, panic,
//! queue rejection or shutdown.

pub mod config;
pub mod dispatcher;
pub mod inflight;
pub mod job;
pub mod worker;


pub use config::DispatchConfig;
pub use dispatcher::{DispatchOutcome, RerankDispatcher, RerankReceiver};
pub use inflight::{InFlightGuard, InFlightSet};
pub use job::RerankJob;
pub use worker::{JobReport, RerankWorkerPool, process_job};
