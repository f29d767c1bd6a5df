use thiserror::Error;

/// Errors from repository operations (used by trait definitions in lumen-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Fatal configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bot token is not configured (set bot_token in config.toml or LUMEN_BOT_TOKEN)")]
    MissingBotToken,

    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Errors from the chat transport (Telegram Bot API).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request error: {0}")]
    Request(String),

    #[error("api error: {0}")]
    Api(String),
}

/// Errors from the optional generative text service.
#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("authentication failed")]
    Authentication,

    #[error("rate limited")]
    RateLimited,

    #[error("request error: {0}")]
    Request(String),

    #[error("empty completion")]
    EmptyCompletion,
}
