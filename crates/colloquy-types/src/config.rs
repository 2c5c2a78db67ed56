//! Service configuration types for Colloquy.
//!
//! `AppConfig` represents the `config.toml` in the data directory. Every
//! field has a default so an absent or partial file still yields a usable
//! configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Chat-completion provider settings.
///
/// The API key itself is never stored here; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant named 'DjangoBot'. Respond concisely and helpfully.".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Reply pacing: after each reply the responder waits
/// `clamp(len / chars_per_unit, min_units, max_units)` units of `unit_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_unit_ms")]
    pub unit_ms: u64,
    #[serde(default = "default_chars_per_unit")]
    pub chars_per_unit: u32,
    #[serde(default = "default_min_units")]
    pub min_units: f64,
    #[serde(default = "default_max_units")]
    pub max_units: f64,
}

impl PacingConfig {
    /// Whether the unit bounds are finite, non-negative and ordered.
    pub fn is_valid(&self) -> bool {
        self.min_units.is_finite()
            && self.max_units.is_finite()
            && self.min_units >= 0.0
            && self.min_units <= self.max_units
    }
}

fn default_unit_ms() -> u64 {
    1000
}

fn default_chars_per_unit() -> u32 {
    50
}

fn default_min_units() -> f64 {
    1.0
}

fn default_max_units() -> f64 {
    3.0
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            unit_ms: default_unit_ms(),
            chars_per_unit: default_chars_per_unit(),
            min_units: default_min_units(),
            max_units: default_max_units(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing_validity() {
        assert!(PacingConfig::default().is_valid());

        let inverted = PacingConfig {
            min_units: 3.0,
            max_units: 1.0,
            ..PacingConfig::default()
        };
        assert!(!inverted.is_valid());

        let negative = PacingConfig {
            min_units: -2.0,
            max_units: -1.0,
            ..PacingConfig::default()
        };
        assert!(!negative.is_valid());

        let nan = PacingConfig {
            max_units: f64::NAN,
            ..PacingConfig::default()
        };
        assert!(!nan.is_valid());
    }

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert!((config.llm.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.pacing.unit_ms, 1000);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.pacing.chars_per_unit, 50);
        assert!(config.llm.system_prompt.contains("DjangoBot"));
    }

    #[test]
    fn test_app_config_deserialize_partial() {
        let toml_str = r#"
[server]
port = 9090

[llm]
model = "gpt-4o-mini"
temperature = 0.2

[pacing]
unit_ms = 0
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.pacing.unit_ms, 0);
        assert!((config.pacing.max_units - 3.0).abs() < f64::EPSILON);
    }
}
