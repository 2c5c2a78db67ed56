//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `colloquy-core`, plus [`build_provider`], which reads
//! the API key from the environment and returns `None` when it is absent.
//!
//! [`LlmProvider`]: colloquy_core::llm::provider::LlmProvider

pub mod openai;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use colloquy_core::llm::box_provider::BoxLlmProvider;
use colloquy_types::config::LlmConfig;

use self::openai::OpenAiProvider;

/// Read an API key from the environment variable `var`.
///
/// Unset and blank values are both treated as missing.
pub fn api_key_from_env(var: &str) -> Option<SecretString> {
    let value = std::env::var(var).ok()?;
    let secret = SecretString::from(value.trim().to_string());
    if secret.expose_secret().is_empty() {
        None
    } else {
        Some(secret)
    }
}

/// Construct a [`BoxLlmProvider`] from the configuration and a key.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> BoxLlmProvider {
    BoxLlmProvider::new(OpenAiProvider::new(
        api_key,
        &config.base_url,
        &config.model,
    ))
}

/// Construct the configured provider if its API key is present.
///
/// A missing key is not fatal: the server starts and every send reports the
/// AI service as unavailable.
pub fn build_provider(config: &LlmConfig) -> Option<BoxLlmProvider> {
    match api_key_from_env(&config.api_key_env) {
        Some(key) => {
            info!(model = %config.model, base_url = %config.base_url, "LLM provider configured");
            Some(create_provider(config, key))
        }
        None => {
            warn!(
                env = %config.api_key_env,
                "LLM API key is not set; sending messages will fail until it is"
            );
            None
        }
    }
}
