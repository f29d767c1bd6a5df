//! Application state wiring all services together.
//!
//! The dispatcher is generic over repository/provider traits; AppState
//! pins it to the concrete infra implementations and owns the transport
//! client used by the polling loop.

use std::path::PathBuf;
use std::sync::Arc;

use lumen_core::dispatch::Dispatcher;
use lumen_infra::config::{database_url, load_config, resolve_data_dir};
use lumen_infra::i18n::load_catalogs;
use lumen_infra::openai::OpenAiGenerative;
use lumen_infra::sqlite::journal::SqliteJournalRepository;
use lumen_infra::sqlite::pool::DatabasePool;
use lumen_infra::sqlite::user::SqliteUserRepository;
use lumen_infra::telegram::TelegramClient;

/// Concrete dispatcher type pinned to the infra implementations.
pub type ConcreteDispatcher =
    Dispatcher<SqliteUserRepository, SqliteJournalRepository, OpenAiGenerative>;

/// Shared application state for the polling loop.
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
    pub telegram: Arc<TelegramClient>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, wire the dispatcher and transport.
    ///
    /// Fails fast on a missing bot token -- nothing is opened or spawned
    /// before configuration validates.
    pub async fn init(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir_override.unwrap_or_else(resolve_data_dir);

        // Configuration first: a missing token must abort before any IO.
        let config = Arc::new(load_config(&data_dir).await?);

        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let users = SqliteUserRepository::new(db_pool.clone());
        let journal = SqliteJournalRepository::new(db_pool.clone());

        let generative = config
            .openai_api_key
            .as_ref()
            .map(|key| OpenAiGenerative::new(key, config.openai_model.clone()));
        if generative.is_none() {
            tracing::info!("generative fallback disabled: no API key configured");
        }

        let catalogs = load_catalogs(Some(&data_dir.join("i18n")), &config.default_lang).await;

        let telegram = Arc::new(TelegramClient::new(config.bot_token.clone()));

        let dispatcher = Arc::new(Dispatcher::new(
            config.clone(),
            users,
            journal,
            generative,
            catalogs,
        ));

        Ok(Self {
            dispatcher,
            telegram,
            data_dir,
        })
    }
}
