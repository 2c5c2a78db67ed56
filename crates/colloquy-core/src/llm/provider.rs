//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM backends implement.

use colloquy_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (OpenAI-compatible chat completion APIs).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in colloquy-infra (e.g., `OpenAiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
