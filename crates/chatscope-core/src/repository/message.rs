//! MessageStore trait definition.

use chatscope_types::error::RepositoryError;
use chatscope_types::message::RawMessage;

/// Read access to the append-only chat message collection.
///
/// Implementations live in chatscope-infra (e.g., `SqliteMessageStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageStore: Send + Sync {
    /// Every stored message, in arrival order.
    fn list_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RawMessage>, RepositoryError>> + Send;

    /// Messages of a single session, in arrival order.
    fn list_session_messages(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RawMessage>, RepositoryError>> + Send;
}
