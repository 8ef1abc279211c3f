//! SQLite subscription store implementation.
//!
//! Implements `SubscriptionStore` from `chatscope-core` over the
//! `email_subscriptions` table, with the same lookup/upsert/read-back
//! transaction as the status store.

use chatscope_core::repository::subscription::SubscriptionStore;
use chatscope_types::error::RepositoryError;
use chatscope_types::subscription::{EmailSubscription, SubscriptionOutcome};
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `SubscriptionStore`.
pub struct SqliteSubscriptionStore {
    pool: DatabasePool,
}

impl SqliteSubscriptionStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SubscriptionRow {
    email: String,
    is_subscribed: bool,
    created_at: String,
    updated_at: String,
}

impl SubscriptionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            email: row.try_get("email")?,
            is_subscribed: row.try_get("is_subscribed")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_subscription(self) -> Result<EmailSubscription, RepositoryError> {
        Ok(EmailSubscription {
            email: self.email,
            is_subscribed: self.is_subscribed,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn row_to_subscription(row: &sqlx::sqlite::SqliteRow) -> Result<EmailSubscription, RepositoryError> {
    SubscriptionRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_subscription()
}

// ---------------------------------------------------------------------------
// SubscriptionStore implementation
// ---------------------------------------------------------------------------

impl SubscriptionStore for SqliteSubscriptionStore {
    async fn list_subscriptions(&self) -> Result<Vec<EmailSubscription>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT email, is_subscribed, created_at, updated_at FROM email_subscriptions",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut subscriptions = rows
            .iter()
            .map(row_to_subscription)
            .collect::<Result<Vec<_>, _>>()?;
        // Sorted on parsed timestamps; the stored text has variable precision.
        subscriptions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(subscriptions)
    }

    async fn get_subscription(&self, email: &str) -> Result<Option<EmailSubscription>, RepositoryError> {
        let row = sqlx::query(
            "SELECT email, is_subscribed, created_at, updated_at FROM email_subscriptions WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn upsert_subscription(
        &self,
        email: &str,
        is_subscribed: bool,
        at: DateTime<Utc>,
    ) -> Result<SubscriptionOutcome, RepositoryError> {
        let at = format_datetime(&at);
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT email FROM email_subscriptions WHERE email = ?")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;

        sqlx::query(
            r#"INSERT INTO email_subscriptions (email, is_subscribed, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(email) DO UPDATE SET
                   is_subscribed = excluded.is_subscribed,
                   updated_at = excluded.updated_at"#,
        )
        .bind(email)
        .bind(is_subscribed)
        .bind(&at)
        .bind(&at)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        let row = sqlx::query(
            "SELECT email, is_subscribed, created_at, updated_at FROM email_subscriptions WHERE email = ?",
        )
        .bind(email)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;
        let record = row_to_subscription(&row)?;

        tx.commit().await.map_err(query_error)?;

        let matched_existing = existing.is_some();
        debug!(email, is_subscribed, matched_existing, "Upserted subscription");
        Ok(SubscriptionOutcome {
            matched_existing,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    async fn test_store() -> (SqliteSubscriptionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        (SqliteSubscriptionStore::new(pool), dir)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let (store, _dir) = test_store().await;
        let later = t0() + TimeDelta::days(2);

        let created = store
            .upsert_subscription("ops@example.com", true, t0())
            .await
            .unwrap();
        assert!(!created.matched_existing);
        assert!(created.record.is_subscribed);

        let updated = store
            .upsert_subscription("ops@example.com", false, later)
            .await
            .unwrap();
        assert!(updated.matched_existing);
        assert!(!updated.record.is_subscribed);
        assert_eq!(updated.record.created_at, t0());
        assert_eq!(updated.record.updated_at, later);

        let fetched = store.get_subscription("ops@example.com").await.unwrap().unwrap();
        assert_eq!(fetched, updated.record);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (store, _dir) = test_store().await;
        store
            .upsert_subscription("old@example.com", true, t0())
            .await
            .unwrap();
        store
            .upsert_subscription("new@example.com", true, t0() + TimeDelta::milliseconds(1500))
            .await
            .unwrap();
        store
            .upsert_subscription("mid@example.com", false, t0() + TimeDelta::seconds(1))
            .await
            .unwrap();

        let emails: Vec<String> = store
            .list_subscriptions()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.email)
            .collect();
        assert_eq!(
            emails,
            vec!["new@example.com", "mid@example.com", "old@example.com"]
        );
    }

    #[tokio::test]
    async fn test_get_missing_subscription() {
        let (store, _dir) = test_store().await;
        assert!(store.get_subscription("nobody@example.com").await.unwrap().is_none());
        assert!(store.list_subscriptions().await.unwrap().is_empty());
    }
}
