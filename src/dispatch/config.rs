use std::time::Duration;

use crate::config::{ConfigError, parse_or};
use crate::constants::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RERANK_TIMEOUT_SECS, DEFAULT_WORKER_COUNT};

/// Sizing of the rerank queue and worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Bounded queue capacity. Default: `1000`.
    pub queue_capacity: usize,
    /// Worker tasks consuming the queue. Default: `1`.
    pub workers: usize,
    /// Upper bound on a single rerank call. Default: `60s`.
    pub rerank_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKER_COUNT,
            rerank_timeout: Duration::from_secs(DEFAULT_RERANK_TIMEOUT_SECS),
        }
    }
}

impl DispatchConfig {
    pub const ENV_QUEUE_CAPACITY: &'static str = "AISLE_RERANK_QUEUE_CAPACITY";
    pub const ENV_WORKERS: &'static str = "AISLE_RERANK_WORKERS";
    pub const ENV_TIMEOUT_SECS: &'static str = "AISLE_RERANK_TIMEOUT_SECS";

    /// Reads overrides; unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            queue_capacity: parse_or(Self::ENV_QUEUE_CAPACITY, defaults.queue_capacity),
            workers: parse_or(Self::ENV_WORKERS, defaults.workers),
            rerank_timeout: Duration::from_secs(parse_or(
                Self::ENV_TIMEOUT_SECS,
                defaults.rerank_timeout.as_secs(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_QUEUE_CAPACITY,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_WORKERS,
            });
        }
        if self.rerank_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_TIMEOUT_SECS,
            });
        }
        Ok(())
    }
}
