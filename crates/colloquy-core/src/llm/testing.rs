//! Scripted `LlmProvider` used by the responder and turn tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use colloquy_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

use super::provider::LlmProvider;

/// Replays queued outcomes in order and records every request it receives.
///
/// Once the queue is empty each call returns a `Provider` error.
#[derive(Clone, Default)]
pub(crate) struct ScriptedProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub(crate) fn replying(content: &str) -> Self {
        let provider = Self::default();
        provider.push(Ok(content.to_string()));
        provider
    }

    pub(crate) fn failing(err: LlmError) -> Self {
        let provider = Self::default();
        provider.push(Err(err));
        provider
    }

    pub(crate) fn push(&self, outcome: Result<String, LlmError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.outcomes.lock().unwrap().pop_front();
        let content = next.unwrap_or_else(|| {
            Err(LlmError::Provider {
                message: "no scripted reply left".to_string(),
            })
        })?;
        Ok(CompletionResponse {
            id: "cmpl-test".to_string(),
            content,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 12,
                output_tokens: 8,
            },
        })
    }
}
