//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `chatscope-core` over the `chat_history`
//! table. Rows come back in `id` order, which is arrival order. Timestamps
//! are returned as the stored text; the aggregation engine parses them.

use chatscope_core::repository::message::MessageStore;
use chatscope_types::error::RepositoryError;
use chatscope_types::message::RawMessage;
use sqlx::Row;
use tracing::info;

use super::pool::DatabasePool;
use super::query_error;

/// SQLite-backed implementation of `MessageStore`.
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Append messages in one transaction, preserving slice order.
    ///
    /// Only the import command writes here; the dashboard core never does.
    pub async fn append_messages(&self, messages: &[RawMessage]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        for message in messages {
            sqlx::query(
                "INSERT INTO chat_history (session_id, role, content, timestamp) VALUES (?, ?, ?, ?)",
            )
            .bind(&message.session_id)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(&message.timestamp)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;

        info!(count = messages.len(), "Appended chat messages");
        Ok(messages.len() as u64)
    }

    /// Number of stored messages, including ones no conversation shows.
    pub async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_history")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count as u64)
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    session_id: String,
    role: String,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> RawMessage {
        RawMessage {
            session_id: self.session_id,
            role: self.role.into(),
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

fn rows_to_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<RawMessage>, RepositoryError> {
    rows.iter()
        .map(|row| {
            MessageRow::from_row(row)
                .map(MessageRow::into_message)
                .map_err(|e| RepositoryError::Query(e.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn list_messages(&self) -> Result<Vec<RawMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, role, content, timestamp FROM chat_history ORDER BY id ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows_to_messages(&rows)
    }

    async fn list_session_messages(
        &self,
        session_id: &str,
    ) -> Result<Vec<RawMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, role, content, timestamp FROM chat_history WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows_to_messages(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscope_types::message::MessageRole;

    async fn test_store() -> (SqliteMessageStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        (SqliteMessageStore::new(pool), dir)
    }

    fn raw(session: &str, role: &str, content: &str, timestamp: &str) -> RawMessage {
        RawMessage {
            session_id: session.to_string(),
            role: role.parse().unwrap(),
            content: content.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_in_arrival_order() {
        let (store, _dir) = test_store().await;
        let messages = vec![
            raw("s1", "assistant", "later", "2025-06-01T12:01:00Z"),
            raw("s2", "user", "other", "2025-06-01T11:00:00Z"),
            raw("s1", "user", "earlier", "2025-06-01T12:00:00Z"),
        ];
        assert_eq!(store.append_messages(&messages).await.unwrap(), 3);

        let listed = store.list_messages().await.unwrap();
        assert_eq!(listed, messages);
        assert_eq!(store.count_messages().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_session_messages() {
        let (store, _dir) = test_store().await;
        store
            .append_messages(&[
                raw("s1", "user", "a", "2025-06-01T12:00:00Z"),
                raw("s2", "user", "b", "2025-06-01T12:00:00Z"),
                raw("s1", "assistant", "c", "2025-06-01T12:00:05Z"),
            ])
            .await
            .unwrap();

        let s1 = store.list_session_messages("s1").await.unwrap();
        let contents: Vec<&str> = s1.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
        assert!(store.list_session_messages("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_and_unknown_role_survive_storage() {
        let (store, _dir) = test_store().await;
        store
            .append_messages(&[raw("s1", "System", "<b>hi</b>", "not-a-date")])
            .await
            .unwrap();

        let listed = store.list_messages().await.unwrap();
        assert_eq!(listed[0].role, MessageRole::Other("System".to_string()));
        assert_eq!(listed[0].timestamp, "not-a-date");
        assert_eq!(listed[0].content, "<b>hi</b>");
    }

    #[tokio::test]
    async fn test_count_messages_on_empty_store() {
        let (store, _dir) = test_store().await;
        assert_eq!(store.count_messages().await.unwrap(), 0);
        assert_eq!(store.append_messages(&[]).await.unwrap(), 0);
        assert!(store.list_messages().await.unwrap().is_empty());
    }
}
