//! User profile types for Lumen.
//!
//! A profile is created on first contact with the configured default
//! language and country, and mutated only by explicit settings commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered chat user.
///
/// `user_id` is the opaque identifier handed to us by the chat transport
/// (a Telegram user id). Language and country are free-form codes validated
/// against the configured recognized sets, not enums, so localization can be
/// extended without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub lang: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a fresh profile with the given defaults.
    pub fn new(user_id: i64, default_lang: &str, default_country: &str) -> Self {
        Self {
            user_id,
            lang: default_lang.to_string(),
            country: default_country.to_string(),
            created_at: Utc::now(),
        }
    }
}
