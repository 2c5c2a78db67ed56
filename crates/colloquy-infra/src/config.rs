//! Application configuration loader for Colloquy.
//!
//! Reads `config.toml` from the data directory (`~/.colloquy/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to the
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use colloquy_types::config::{AppConfig, PacingConfig};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "COLLOQUY_DATA_DIR";

/// Resolve the data directory.
///
/// `COLLOQUY_DATA_DIR` wins, then `~/.colloquy`, then `./.colloquy` when no
/// home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".colloquy"))
        .unwrap_or_else(|| PathBuf::from(".colloquy"))
}

/// SQLite URL for the database file inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("colloquy.db").display())
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(mut config) => {
            if !config.pacing.is_valid() {
                tracing::warn!(
                    min_units = config.pacing.min_units,
                    max_units = config.pacing.max_units,
                    "Invalid [pacing] bounds in {}, using default pacing",
                    config_path.display()
                );
                config.pacing = PacingConfig::default();
            }
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}
