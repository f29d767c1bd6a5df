//! Infrastructure implementations for Lumen.
//!
//! Concrete adapters behind the ports defined in `lumen-core`: SQLite
//! repositories, the config loader, JSON message catalogs, the Telegram
//! Bot API client, and the OpenAI-compatible generative provider.

pub mod config;
pub mod i18n;
pub mod openai;
pub mod sqlite;
pub mod telegram;
