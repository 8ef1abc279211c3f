//! Dashboard snapshot: the result of one refresh pass.
//!
//! The snapshot doubles as the presentation layer's read-through cache of
//! the status store. Its override table and effective statuses change only
//! through [`Dashboard::apply_confirmed`], which callers invoke after the
//! store has acknowledged a write.

use chatscope_types::conversation::ResolvedConversation;
use chatscope_types::message::RawMessage;
use chatscope_types::status::{FlagStatus, OverrideTable, StatusOverride};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{aggregate_with_report, AggregationReport};
use crate::projection::{project, ConversationRow};
use crate::resolver::StatusResolver;

/// Resolved conversations plus the override table they were resolved with.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub evaluated_at: DateTime<Utc>,
    pub conversations: Vec<ResolvedConversation>,
    pub overrides: OverrideTable,
    pub report: AggregationReport,
}

/// Conversation counts per effective status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub incomplete: usize,
    pub complete: usize,
    pub overridden: usize,
}

impl Dashboard {
    /// Aggregate `messages` and resolve them against `overrides` at `now`.
    pub fn build(
        messages: &[RawMessage],
        overrides: OverrideTable,
        resolver: &StatusResolver,
        now: DateTime<Utc>,
    ) -> Self {
        let (conversations, report) = aggregate_with_report(messages);
        let conversations = resolver.resolve_all(conversations, &overrides, now);
        Self {
            evaluated_at: now,
            conversations,
            overrides,
            report,
        }
    }

    /// Newest-first rows matching `query` (empty keeps all).
    pub fn rows(&self, query: &str) -> Vec<ConversationRow<'_>> {
        project(&self.conversations, query)
    }

    pub fn get(&self, session_id: &str) -> Option<&ResolvedConversation> {
        self.conversations
            .iter()
            .find(|c| c.session_id() == session_id)
    }

    /// Conversations whose effective status is `status`.
    pub fn with_status(
        &self,
        status: FlagStatus,
    ) -> impl Iterator<Item = &ResolvedConversation> + '_ {
        self.conversations
            .iter()
            .filter(move |c| c.effective_status == status)
    }

    /// Record a write the status store has confirmed.
    ///
    /// Returns `true` when a visible conversation's effective status changed
    /// as a result. The override is kept even for sessions not currently
    /// visible, mirroring the store.
    pub fn apply_confirmed(&mut self, record: StatusOverride) -> bool {
        let mut changed = false;
        if let Some(conv) = self
            .conversations
            .iter_mut()
            .find(|c| c.conversation.session_id == record.session_id)
        {
            changed = conv.effective_status != record.flag_status;
            conv.effective_status = record.flag_status;
            conv.overridden = true;
        }
        debug!(
            session_id = %record.session_id,
            flag_status = %record.flag_status,
            changed,
            "Applied confirmed status override"
        );
        self.overrides.insert(record.session_id.clone(), record);
        changed
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary {
            total: self.conversations.len(),
            ..StatusSummary::default()
        };
        for conv in &self.conversations {
            match conv.effective_status {
                FlagStatus::Pending => summary.pending += 1,
                FlagStatus::Incomplete => summary.incomplete += 1,
                FlagStatus::Complete => summary.complete += 1,
            }
            if conv.overridden {
                summary.overridden += 1;
            }
        }
        summary
    }
}
