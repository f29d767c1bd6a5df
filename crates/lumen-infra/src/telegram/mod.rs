//! Telegram Bot API client: long-poll `getUpdates` plus `sendMessage`.
//!
//! The bot token is wrapped in [`secrecy::SecretString`] and only exposed
//! when building the request URL; it never appears in Debug output or
//! tracing logs.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use lumen_types::error::TransportError;

use self::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, Update};

/// Long-poll duration requested from the Bot API.
const POLL_TIMEOUT_SECS: u32 = 30;

/// Telegram Bot API transport.
///
/// # Token Security
///
/// Does NOT derive Debug: the token is embedded in every request URL and
/// must never leak through formatting.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl TelegramClient {
    /// Create a new client for the given bot token.
    pub fn new(token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            // Long poll (30s) plus margin; also bounds sendMessage.
            .timeout(Duration::from_secs(50))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            base_url: "https://api.telegram.org".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a method.
    fn url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let response = self
            .client
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !envelope.ok {
            return Err(TransportError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown api error".to_string()),
            ));
        }

        envelope
            .result
            .ok_or_else(|| TransportError::Api("ok response without result".to_string()))
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: POLL_TIMEOUT_SECS,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    /// Send a plain-text reply to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let _: types::Message = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(())
    }
}
