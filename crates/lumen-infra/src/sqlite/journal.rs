//! SQLite journal repository implementation.
//!
//! Implements `JournalRepository` from `lumen-core`: append-only check-ins,
//! trigger notes, and plan items. A check-in is one INSERT statement so the
//! four answers land atomically; the trailing-window query compares
//! RFC-3339 strings, which sort chronologically.

use chrono::{DateTime, Utc};
use sqlx::Row;

use lumen_core::repository::JournalRepository;
use lumen_types::entry::{CheckinEntry, TriggerEntry};
use lumen_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `JournalRepository`.
pub struct SqliteJournalRepository {
    pool: DatabasePool,
}

impl SqliteJournalRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain CheckinEntry.
struct CheckinRow {
    user_id: i64,
    ts: String,
    stress: Option<f64>,
    triggers: String,
    sleep_hours: Option<f64>,
    micro_goal: String,
}

impl CheckinRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            ts: row.try_get("ts")?,
            stress: row.try_get("stress")?,
            triggers: row.try_get("triggers")?,
            sleep_hours: row.try_get("sleep_hours")?,
            micro_goal: row.try_get("micro_goal")?,
        })
    }

    fn into_entry(self) -> Result<CheckinEntry, RepositoryError> {
        Ok(CheckinEntry {
            user_id: self.user_id,
            ts: parse_datetime(&self.ts)?,
            stress: self.stress,
            triggers: self.triggers,
            sleep_hours: self.sleep_hours,
            micro_goal: self.micro_goal,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl JournalRepository for SqliteJournalRepository {
    async fn save_checkin(&self, entry: &CheckinEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO checkins (user_id, ts, stress, triggers, sleep_hours, micro_goal)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.user_id)
        .bind(entry.ts.to_rfc3339())
        .bind(entry.stress)
        .bind(&entry.triggers)
        .bind(entry.sleep_hours)
        .bind(&entry.micro_goal)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn save_trigger(&self, entry: &TriggerEntry) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO triggers (user_id, ts, note) VALUES (?, ?, ?)")
            .bind(entry.user_id)
            .bind(entry.ts.to_rfc3339())
            .bind(&entry.note)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn save_plan_items(
        &self,
        user_id: i64,
        ts: DateTime<Utc>,
        items: &[String],
    ) -> Result<(), RepositoryError> {
        for item in items {
            sqlx::query("INSERT INTO plans (user_id, ts, item) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(ts.to_rfc3339())
                .bind(item)
                .execute(&self.pool.writer)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }
        Ok(())
    }

    async fn checkins_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckinEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT user_id, ts, stress, triggers, sleep_hours, micro_goal
             FROM checkins WHERE user_id = ? AND ts >= ? ORDER BY ts ASC",
        )
        .bind(user_id)
        .bind(since.to_rfc3339())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let checkin_row =
                CheckinRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(checkin_row.into_entry()?);
        }

        Ok(entries)
    }

    async fn count_checkins_since(&self, since: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM checkins WHERE ts >= ?")
            .bind(since.to_rfc3339())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(row.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    fn checkin(user_id: i64, ts: DateTime<Utc>, stress: Option<f64>) -> CheckinEntry {
        CheckinEntry {
            user_id,
            ts,
            stress,
            triggers: "deadline".to_string(),
            sleep_hours: Some(6.5),
            micro_goal: "walk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_checkin_roundtrip() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteJournalRepository::new(pool);

        let now = Utc::now();
        repo.save_checkin(&checkin(1, now, Some(7.0))).await.unwrap();

        let entries = repo
            .checkins_since(1, now - Duration::days(1))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stress, Some(7.0));
        assert_eq!(entries[0].triggers, "deadline");
        assert_eq!(entries[0].sleep_hours, Some(6.5));
    }

    #[tokio::test]
    async fn test_window_excludes_old_entries() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteJournalRepository::new(pool);

        let now = Utc::now();
        repo.save_checkin(&checkin(1, now - Duration::days(10), Some(2.0)))
            .await
            .unwrap();
        repo.save_checkin(&checkin(1, now - Duration::days(2), Some(4.0)))
            .await
            .unwrap();

        let entries = repo
            .checkins_since(1, now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stress, Some(4.0));

        let all = repo
            .checkins_since(1, now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        // Oldest first.
        assert_eq!(all[0].stress, Some(2.0));
    }

    #[tokio::test]
    async fn test_window_is_per_user() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteJournalRepository::new(pool);

        let now = Utc::now();
        repo.save_checkin(&checkin(1, now, Some(1.0))).await.unwrap();
        repo.save_checkin(&checkin(2, now, Some(9.0))).await.unwrap();

        let entries = repo
            .checkins_since(1, now - Duration::days(1))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, 1);

        // The admin count spans all users.
        assert_eq!(
            repo.count_checkins_since(now - Duration::days(1))
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_nullable_fields_survive_roundtrip() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteJournalRepository::new(pool);

        let now = Utc::now();
        let entry = CheckinEntry {
            user_id: 1,
            ts: now,
            stress: None,
            triggers: String::new(),
            sleep_hours: None,
            micro_goal: String::new(),
        };
        repo.save_checkin(&entry).await.unwrap();

        let entries = repo
            .checkins_since(1, now - Duration::days(1))
            .await
            .unwrap();
        assert!(entries[0].stress.is_none());
        assert!(entries[0].sleep_hours.is_none());
    }

    #[tokio::test]
    async fn test_triggers_and_plans_append() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteJournalRepository::new(pool);

        let now = Utc::now();
        repo.save_trigger(&TriggerEntry {
            user_id: 1,
            ts: now,
            note: "sirens".to_string(),
        })
        .await
        .unwrap();

        repo.save_plan_items(1, now, &["one".to_string(), "two".to_string()])
            .await
            .unwrap();

        let trigger_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM triggers")
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap();
        assert_eq!(trigger_count.0, 1);

        let items: Vec<(String,)> = sqlx::query_as("SELECT item FROM plans ORDER BY id")
            .fetch_all(&repo.pool.reader)
            .await
            .unwrap();
        assert_eq!(items[0].0, "one");
        assert_eq!(items[1].0, "two");
    }
}
