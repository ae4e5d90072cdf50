use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::query::DedupKey;

/// Keys with a rerank job queued or running.
///
/// Cloning shares the same set. Membership is only granted through [`InFlightSet::acquire`],
/// and the returned guard is the only way a key leaves the set.
#[derive(Clone, Default)]
pub struct InFlightSet {
    keys: Arc<Mutex<HashSet<DedupKey>>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` unless present. Check and insert happen under one lock.
    pub fn acquire(&self, key: DedupKey) -> Option<InFlightGuard> {
        if !self.keys.lock().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            set: self.clone(),
            key,
        })
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }

    /// Snapshot of the current keys, sorted.
    pub fn keys(&self) -> Vec<DedupKey> {
        let mut keys: Vec<DedupKey> = self.keys.lock().iter().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for InFlightSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightSet")
            .field("len", &self.len())
            .finish()
    }
}

/// Membership of one key in an [`InFlightSet`]. Dropping it removes the key.
#[must_use = "dropping the guard releases the key immediately"]
pub struct InFlightGuard {
    set: InFlightSet,
    key: DedupKey,
}

impl InFlightGuard {
    pub fn key(&self) -> &DedupKey {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.keys.lock().remove(&self.key);
    }
}

impl std::fmt::Debug for InFlightGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("InFlightGuard").field(&self.key).finish()
    }
}
