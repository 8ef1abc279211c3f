//! Dashboard service orchestrating refresh passes and status overrides.
//!
//! DashboardService reads the message and status stores, runs the
//! aggregation and resolution passes, and owns the single mutation path
//! into the status store.

use chatscope_types::conversation::ResolvedConversation;
use chatscope_types::error::DashboardError;
use chatscope_types::status::{OverrideTable, UpsertOutcome};
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::aggregate::aggregate;
use crate::dashboard::Dashboard;
use crate::repository::message::MessageStore;
use crate::repository::status::StatusStore;
use crate::resolver::{parse_flag_status, StatusResolver};

const MESSAGE_STORE: &str = "message store";
const STATUS_STORE: &str = "status store";

/// Generic over `MessageStore` and `StatusStore` to maintain clean
/// architecture (chatscope-core never depends on chatscope-infra).
pub struct DashboardService<M: MessageStore, S: StatusStore> {
    messages: M,
    statuses: S,
    resolver: StatusResolver,
}

impl<M: MessageStore, S: StatusStore> DashboardService<M, S> {
    pub fn new(messages: M, statuses: S, resolver: StatusResolver) -> Self {
        Self {
            messages,
            statuses,
            resolver,
        }
    }

    pub fn message_store(&self) -> &M {
        &self.messages
    }

    pub fn status_store(&self) -> &S {
        &self.statuses
    }

    pub fn resolver(&self) -> &StatusResolver {
        &self.resolver
    }

    // --- Refresh ---

    /// Run a full refresh pass evaluated at the current time.
    pub async fn refresh(&self) -> Result<Dashboard, DashboardError> {
        self.refresh_at(Utc::now()).await
    }

    /// Run a full refresh pass evaluated at `now`.
    ///
    /// Either store failing to read fails the whole pass.
    #[instrument(skip(self))]
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<Dashboard, DashboardError> {
        let messages = self
            .messages
            .list_messages()
            .await
            .map_err(|source| DashboardError::SourceUnavailable {
                store: MESSAGE_STORE,
                source,
            })?;
        let overrides = self.load_overrides().await?;

        let dashboard = Dashboard::build(&messages, overrides, &self.resolver, now);
        info!(
            messages = messages.len(),
            conversations = dashboard.conversations.len(),
            overrides = dashboard.overrides.len(),
            "Dashboard refreshed"
        );
        Ok(dashboard)
    }

    async fn load_overrides(&self) -> Result<OverrideTable, DashboardError> {
        self.statuses
            .list_overrides()
            .await
            .map_err(|source| DashboardError::SourceUnavailable {
                store: STATUS_STORE,
                source,
            })
    }

    /// Aggregate and resolve a single session.
    ///
    /// Returns `None` when the session has no messages or fails the
    /// visibility filter.
    pub async fn conversation_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ResolvedConversation>, DashboardError> {
        let messages = self
            .messages
            .list_session_messages(session_id)
            .await
            .map_err(|source| DashboardError::SourceUnavailable {
                store: MESSAGE_STORE,
                source,
            })?;

        let mut overrides = OverrideTable::new();
        if let Some(record) = self
            .statuses
            .get_override(session_id)
            .await
            .map_err(|source| DashboardError::SourceUnavailable {
                store: STATUS_STORE,
                source,
            })?
        {
            overrides.insert(record.session_id.clone(), record);
        }

        Ok(aggregate(&messages)
            .into_iter()
            .find(|c| c.session_id == session_id)
            .map(|c| self.resolver.resolve(c, &overrides, now)))
    }

    // --- Overrides ---

    /// Validate and persist an operator status for `session_id`.
    pub async fn set_override(
        &self,
        session_id: &str,
        status: &str,
    ) -> Result<UpsertOutcome, DashboardError> {
        self.set_override_at(session_id, status, Utc::now()).await
    }

    /// [`set_override`](Self::set_override) with an explicit write time.
    ///
    /// Validation happens before the store is touched; an invalid status
    /// leaves the store unchanged.
    #[instrument(skip(self, at))]
    pub async fn set_override_at(
        &self,
        session_id: &str,
        status: &str,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, DashboardError> {
        if session_id.trim().is_empty() {
            return Err(DashboardError::MissingSessionId);
        }
        let flag_status = parse_flag_status(status)?;

        let outcome = self
            .statuses
            .upsert_override(session_id, flag_status, at)
            .await
            .map_err(|source| {
                warn!(session_id = %session_id, error = %source, "Status upsert failed");
                DashboardError::PersistenceWriteFailed {
                    session_id: session_id.to_string(),
                    source,
                }
            })?;

        info!(
            session_id = %session_id,
            flag_status = %flag_status,
            matched_existing = outcome.matched_existing,
            "Status override saved"
        );
        Ok(outcome)
    }

    /// Persist an override and, only once the store confirms, apply it to
    /// `dashboard`. On error the snapshot is left untouched.
    pub async fn set_and_apply(
        &self,
        dashboard: &mut Dashboard,
        session_id: &str,
        status: &str,
    ) -> Result<UpsertOutcome, DashboardError> {
        let outcome = self.set_override(session_id, status).await?;
        dashboard.apply_confirmed(outcome.record.clone());
        Ok(outcome)
    }
}
