//! Bot configuration types.
//!
//! `BotConfig` is the validated, immutable configuration object handed to
//! every component at construction. It is built from `ConfigFile` (the raw
//! `config.toml` shape, all fields optional or defaulted) plus environment
//! overrides, once, at process start.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Raw `config.toml` shape. Every field is optional or defaulted so a
/// partial file is fine; only the bot token is ultimately required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub bot_token: Option<String>,

    #[serde(default = "default_lang")]
    pub default_lang: String,

    #[serde(default = "default_country")]
    pub default_country: String,

    /// User ids allowed to run `/stats`.
    #[serde(default)]
    pub admins: Vec<i64>,

    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Recognized language codes for `lang <code>`.
    #[serde(default = "default_langs")]
    pub langs: Vec<String>,

    /// Recognized country codes for `country <code>`.
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_country() -> String {
    "US".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_langs() -> Vec<String> {
    vec!["en".to_string(), "uk".to_string()]
}

fn default_countries() -> Vec<String> {
    vec!["US".to_string(), "UA".to_string()]
}

/// Validated runtime configuration.
///
/// The bot token and the optional generative-service key are wrapped in
/// [`SecretString`] so they never appear in Debug output or logs.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: SecretString,
    pub default_lang: String,
    pub default_country: String,
    pub admins: Vec<i64>,
    pub openai_api_key: Option<SecretString>,
    pub openai_model: String,
    pub langs: Vec<String>,
    pub countries: Vec<String>,
}

impl BotConfig {
    /// Validate a raw config file into runtime configuration.
    ///
    /// A missing bot token is fatal (the process must not start); a missing
    /// generative key merely disables the free-form fallback path.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let bot_token = file
            .bot_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingBotToken)?;

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            default_lang: file.default_lang,
            default_country: file.default_country,
            admins: file.admins,
            openai_api_key: file
                .openai_api_key
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            openai_model: file.openai_model,
            langs: file.langs,
            countries: file.countries,
        })
    }

    /// Whether `user_id` may run admin commands.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }
}

// BotConfig derives Debug only because its token and API key are wrapped in
// SecretString, whose own Debug impl redacts the contents -- they never leak
// into logs or panic output.
