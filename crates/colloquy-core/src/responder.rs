//! Chat responder: turns a user input plus prior history into one assistant
//! reply from the LLM provider.
//!
//! The responder is constructed once at startup and shared through
//! application state. Each call builds its own message list, so concurrent
//! turns never observe each other's history.

use std::time::{Duration, Instant};

use tracing::{Instrument, debug, info_span};

use colloquy_types::chat::HistoryEntry;
use colloquy_types::config::{LlmConfig, PacingConfig};
use colloquy_types::llm::{CompletionRequest, LlmError, Message, Usage};

use crate::llm::box_provider::BoxLlmProvider;

/// Fixed parameters of every completion call plus reply pacing.
#[derive(Debug, Clone)]
pub struct ResponderSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub pacing: PacingConfig,
}

impl ResponderSettings {
    pub fn from_config(llm: &LlmConfig, pacing: &PacingConfig) -> Self {
        Self {
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            system_prompt: llm.system_prompt.clone(),
            pacing: pacing.clone(),
        }
    }
}

/// One generated reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub content: String,
    pub model: String,
    pub usage: Usage,
    /// Wall-clock time of the provider call, excluding pacing.
    pub response_ms: u64,
}

pub struct ChatResponder {
    provider: BoxLlmProvider,
    settings: ResponderSettings,
}

impl ChatResponder {
    pub fn new(provider: BoxLlmProvider, settings: ResponderSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Generate a reply to `user_input` given the conversation so far.
    ///
    /// `history` may already end with the current input (the turn handler
    /// saves the user message before calling); it is not sent twice.
    pub async fn respond(
        &self,
        user_input: &str,
        history: &[HistoryEntry],
    ) -> Result<Reply, LlmError> {
        let request = self.build_request(user_input, history);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.message_count = request.messages.len(),
        );

        let started = Instant::now();
        let response = self.provider.complete(&request).instrument(span).await?;
        let response_ms = started.elapsed().as_millis() as u64;

        let delay = pacing_delay(&self.settings.pacing, response.content.chars().count());
        debug!(
            response_ms,
            delay_ms = delay.as_millis() as u64,
            output_tokens = response.usage.output_tokens,
            "Reply received; pacing"
        );
        tokio::time::sleep(delay).await;

        Ok(Reply {
            content: response.content,
            model: response.model,
            usage: response.usage,
            response_ms,
        })
    }

    fn build_request(&self, user_input: &str, history: &[HistoryEntry]) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: build_messages(user_input, history),
            system: Some(self.settings.system_prompt.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        }
    }
}

/// Replay `history` in order and end with the current user input.
pub fn build_messages(user_input: &str, history: &[HistoryEntry]) -> Vec<Message> {
    let mut messages: Vec<Message> = history
        .iter()
        .map(|entry| {
            if entry.is_user {
                Message::user(entry.content.as_str())
            } else {
                Message::assistant(entry.content.as_str())
            }
        })
        .collect();

    let already_last = history
        .last()
        .is_some_and(|last| last.is_user && last.content == user_input);
    if !already_last {
        messages.push(Message::user(user_input));
    }
    messages
}

/// Delay before a reply of `reply_chars` characters is handed back.
///
/// `clamp(reply_chars / chars_per_unit, min_units, max_units)` units, with
/// fractional units allowed. Bounds that are not finite, non-negative and
/// ordered fall back to the defaults.
pub fn pacing_delay(pacing: &PacingConfig, reply_chars: usize) -> Duration {
    let defaults;
    let pacing = if pacing.is_valid() {
        pacing
    } else {
        defaults = PacingConfig {
            unit_ms: pacing.unit_ms,
            chars_per_unit: pacing.chars_per_unit,
            ..PacingConfig::default()
        };
        &defaults
    };

    let per_unit = f64::from(pacing.chars_per_unit.max(1));
    let units = (reply_chars as f64 / per_unit).clamp(pacing.min_units, pacing.max_units);
    Duration::from_secs_f64(units * pacing.unit_ms as f64 / 1000.0)
}
