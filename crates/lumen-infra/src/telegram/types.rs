//! Telegram Bot API wire types.
//!
//! Only the subset the bot consumes: text messages and the update
//! envelope. Unknown fields are ignored by serde, so API additions do not
//! break deserialization.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

impl Update {
    /// Extract `(user_id, chat_id, text)` when this update is an inbound
    /// text message from a real user.
    pub fn text_message(&self) -> Option<(i64, i64, &str)> {
        let message = self.message.as_ref()?;
        let from = message.from.as_ref()?;
        let text = message.text.as_deref()?;
        Some((from.id, message.chat.id, text))
    }
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

/// The sender of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Body for `getUpdates`.
#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    /// Long-poll duration in seconds.
    pub timeout: u32,
    pub allowed_updates: &'static [&'static str],
}

/// Body for `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}
