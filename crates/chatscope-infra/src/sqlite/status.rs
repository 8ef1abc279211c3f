//! SQLite status store implementation.
//!
//! Implements `StatusStore` from `chatscope-core` over the
//! `conversation_flags` table. Upserts run inside a writer transaction so
//! the existence check, the write and the read-back see one consistent
//! state.

use chatscope_core::repository::status::StatusStore;
use chatscope_types::error::RepositoryError;
use chatscope_types::status::{FlagStatus, OverrideTable, StatusOverride, UpsertOutcome};
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `StatusStore`.
pub struct SqliteStatusStore {
    pool: DatabasePool,
}

impl SqliteStatusStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct FlagRow {
    session_id: String,
    flag_status: String,
    created_at: String,
    updated_at: String,
}

impl FlagRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            flag_status: row.try_get("flag_status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_override(self) -> Result<StatusOverride, RepositoryError> {
        let flag_status = self
            .flag_status
            .parse::<FlagStatus>()
            .map_err(RepositoryError::Query)?;
        Ok(StatusOverride {
            session_id: self.session_id,
            flag_status,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn row_to_override(row: &sqlx::sqlite::SqliteRow) -> Result<StatusOverride, RepositoryError> {
    FlagRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_override()
}

// ---------------------------------------------------------------------------
// StatusStore implementation
// ---------------------------------------------------------------------------

impl StatusStore for SqliteStatusStore {
    async fn list_overrides(&self) -> Result<OverrideTable, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, flag_status, created_at, updated_at FROM conversation_flags",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| row_to_override(row).map(|r| (r.session_id.clone(), r)))
            .collect()
    }

    async fn get_override(&self, session_id: &str) -> Result<Option<StatusOverride>, RepositoryError> {
        let row = sqlx::query(
            "SELECT session_id, flag_status, created_at, updated_at FROM conversation_flags WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(row_to_override).transpose()
    }

    async fn upsert_override(
        &self,
        session_id: &str,
        flag_status: FlagStatus,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let at = format_datetime(&at);
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT session_id FROM conversation_flags WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;

        sqlx::query(
            r#"INSERT INTO conversation_flags (session_id, flag_status, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(session_id) DO UPDATE SET
                   flag_status = excluded.flag_status,
                   updated_at = excluded.updated_at"#,
        )
        .bind(session_id)
        .bind(flag_status.to_string())
        .bind(&at)
        .bind(&at)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        let row = sqlx::query(
            "SELECT session_id, flag_status, created_at, updated_at FROM conversation_flags WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;
        let record = row_to_override(&row)?;

        tx.commit().await.map_err(query_error)?;

        let matched_existing = existing.is_some();
        debug!(session_id, %flag_status, matched_existing, "Upserted status override");
        Ok(UpsertOutcome {
            matched_existing,
            record,
        })
    }
}
