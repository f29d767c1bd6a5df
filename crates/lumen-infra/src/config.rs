//! Configuration loader.
//!
//! Reads `config.toml` from the data directory, applies environment
//! overrides for the secrets (`LUMEN_BOT_TOKEN`, `LUMEN_OPENAI_API_KEY`),
//! and validates the result into an immutable [`BotConfig`]. A missing or
//! malformed file falls back to defaults; a missing bot token is fatal.

use std::path::{Path, PathBuf};

use lumen_types::config::{BotConfig, ConfigFile};
use lumen_types::error::ConfigError;

/// Resolve the data directory: `LUMEN_DATA_DIR` env var, falling back to
/// `~/.lumen`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LUMEN_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lumen")
}

/// Default database URL inside the data directory.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("lumen.db").display())
}

/// Load and validate configuration from `{data_dir}/config.toml`.
///
/// - A missing file is fine: defaults apply, secrets may come from the
///   environment.
/// - A malformed file is a startup error, not a silent fallback -- a typo
///   must not quietly drop the admin list.
/// - A missing bot token after overrides is [`ConfigError::MissingBotToken`].
pub async fn load_config(data_dir: &Path) -> Result<BotConfig, ConfigError> {
    let config_path = data_dir.join("config.toml");

    let mut file = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => {
            toml::from_str::<ConfigFile>(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml at {}, using defaults",
                config_path.display()
            );
            ConfigFile::default()
        }
        Err(err) => return Err(ConfigError::Io(err.to_string())),
    };

    if let Ok(token) = std::env::var("LUMEN_BOT_TOKEN") {
        file.bot_token = Some(token);
    }
    if let Ok(key) = std::env::var("LUMEN_OPENAI_API_KEY") {
        file.openai_api_key = Some(key);
    }

    BotConfig::from_file(file)
}
