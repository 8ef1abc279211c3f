//! StatusStore trait definition.

use chatscope_types::error::RepositoryError;
use chatscope_types::status::{FlagStatus, OverrideTable, StatusOverride, UpsertOutcome};
use chrono::{DateTime, Utc};

/// Keyed store of operator status overrides.
///
/// Implementations live in chatscope-infra (e.g., `SqliteStatusStore`).
pub trait StatusStore: Send + Sync {
    /// Every override, keyed by session id.
    fn list_overrides(
        &self,
    ) -> impl std::future::Future<Output = Result<OverrideTable, RepositoryError>> + Send;

    /// The override for one session, if any.
    fn get_override(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<StatusOverride>, RepositoryError>> + Send;

    /// Insert or update the override for `session_id`.
    ///
    /// Must be atomic: a new record gets `created_at == updated_at == at`;
    /// an existing record gets `flag_status` and `updated_at` replaced and
    /// keeps its `created_at`. Readers never observe a half-written record.
    fn upsert_override(
        &self,
        session_id: &str,
        flag_status: FlagStatus,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<UpsertOutcome, RepositoryError>> + Send;
}
