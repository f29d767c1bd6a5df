//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `lumen-core` using sqlx with the split
//! read/write pool: raw queries, a private Row struct, RFC-3339 timestamps.

use chrono::{DateTime, Utc};
use sqlx::Row;

use lumen_core::repository::UserRepository;
use lumen_types::error::RepositoryError;
use lumen_types::user::UserProfile;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain UserProfile.
struct UserRow {
    user_id: i64,
    lang: String,
    country: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            lang: row.try_get("lang")?,
            country: row.try_get("country")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_profile(self) -> Result<UserProfile, RepositoryError> {
        Ok(UserProfile {
            user_id: self.user_id,
            lang: self.lang,
            country: self.country,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl UserRepository for SqliteUserRepository {
    async fn get_or_create(
        &self,
        user_id: i64,
        default_lang: &str,
        default_country: &str,
    ) -> Result<UserProfile, RepositoryError> {
        let row = sqlx::query("SELECT user_id, lang, country, created_at FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if let Some(row) = row {
            let user_row =
                UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            return user_row.into_profile();
        }

        let profile = UserProfile::new(user_id, default_lang, default_country);
        // First contact can race with itself on at-least-once delivery;
        // INSERT OR IGNORE keeps the earliest row.
        sqlx::query(
            "INSERT OR IGNORE INTO users (user_id, lang, country, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(profile.user_id)
        .bind(&profile.lang)
        .bind(&profile.country)
        .bind(profile.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(profile)
    }

    async fn set_lang(&self, user_id: i64, lang: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET lang = ? WHERE user_id = ?")
            .bind(lang)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn set_country(&self, user_id: i64, country: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET country = ? WHERE user_id = ?")
            .bind(country)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }
}
