use std::sync::Arc;

use crate::search::SearchOrchestrator;

#[derive(Clone)]
pub struct HandlerState {
    pub orchestrator: Arc<SearchOrchestrator>,

    /// `"stub"` or `"real"`, reported by `/ready`.
    pub embedder_mode: &'static str,
}

impl HandlerState {
    pub fn new(orchestrator: Arc<SearchOrchestrator>, embedder_is_stub: bool) -> Self {
        Self {
            orchestrator,
            embedder_mode: if embedder_is_stub { "stub" } else { "real" },
        }
    }
}
