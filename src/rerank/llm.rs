use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, instrument};

use super::error::{RerankError, RerankResult};
use super::parse::parse_ranking;
use super::prompt::{SYSTEM_PROMPT, build_prompt};
use super::RerankEngine;
use crate::retrieval::CandidateResult;

/// Chat model used when none is configured.
pub const DEFAULT_RERANK_MODEL: &str = "gpt-5-mini";

/// [`RerankEngine`] that asks a chat model for the ordering.
///
/// Provider credentials are resolved by `genai` from the environment (e.g. `OPENAI_API_KEY`).
#[derive(Clone)]
pub struct LlmReranker {
    client: Client,
    model: String,
}

impl LlmReranker {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for LlmReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmReranker")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl RerankEngine for LlmReranker {
    #[instrument(
        skip(self, candidates),
        fields(model = %self.model, candidates = candidates.len())
    )]
    async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidateResult],
    ) -> RerankResult<Vec<String>> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_prompt(query, candidates)),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| RerankError::Provider {
                reason: e.to_string(),
            })?;

        let text = response.first_text().ok_or_else(|| RerankError::Parse {
            reason: "empty response".to_string(),
        })?;
        debug!(response_len = text.len(), "rerank response received");

        parse_ranking(text)
    }
}
