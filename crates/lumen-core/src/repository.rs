//! Repository trait definitions.
//!
//! These are the persistence "ports" the infrastructure layer implements
//! (e.g., `SqliteUserRepository`). Uses native async fn in traits (RPITIT,
//! Rust 2024 edition).

use chrono::{DateTime, Utc};
use lumen_types::entry::{CheckinEntry, TriggerEntry};
use lumen_types::error::RepositoryError;
use lumen_types::user::UserProfile;

/// User profile persistence.
pub trait UserRepository: Send + Sync {
    /// Fetch the profile for `user_id`, creating it with the given defaults
    /// on first contact.
    fn get_or_create(
        &self,
        user_id: i64,
        default_lang: &str,
        default_country: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, RepositoryError>> + Send;

    /// Update the stored language code.
    fn set_lang(
        &self,
        user_id: i64,
        lang: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Update the stored country code.
    fn set_country(
        &self,
        user_id: i64,
        country: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Total registered users (admin stats).
    fn count_users(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Append-only journal persistence: check-ins, trigger notes, plan items.
pub trait JournalRepository: Send + Sync {
    /// Insert a completed check-in as a single statement -- all four
    /// answers land atomically or not at all.
    fn save_checkin(
        &self,
        entry: &CheckinEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert one trigger note.
    fn save_trigger(
        &self,
        entry: &TriggerEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert plan items in order. Callers cap the list before handing it
    /// over; the repository persists exactly what it is given.
    fn save_plan_items(
        &self,
        user_id: i64,
        ts: DateTime<Utc>,
        items: &[String],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All of a user's check-ins with `ts >= since`, oldest first.
    fn checkins_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<CheckinEntry>, RepositoryError>> + Send;

    /// Check-ins across all users with `ts >= since` (admin stats).
    fn count_checkins_since(
        &self,
        since: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
