//! Status resolver: merges derived classification with operator overrides.
//!
//! Precedence, first match wins:
//! 1. a persisted override, verbatim (no expiry, no automatic reversion);
//! 2. `complete` once the first message is older than the stale threshold;
//! 3. `incomplete` when the user or assistant side is missing;
//! 4. `pending`.
//!
//! Rule 3 cannot fire for conversations that passed the aggregation
//! visibility filter. It stays so the classifier is total over any
//! `Conversation` value.

use chatscope_types::conversation::{Conversation, ResolvedConversation};
use chatscope_types::error::DashboardError;
use chatscope_types::message::MessageRole;
use chatscope_types::status::{FlagStatus, OverrideTable};
use chrono::{DateTime, TimeDelta, Utc};

/// Default age after which an unoverridden conversation counts as complete.
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 7;

/// Pure classifier over (conversation, override table, now).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResolver {
    stale_after: TimeDelta,
}

impl StatusResolver {
    /// Create a resolver with a stale threshold in days (negative clamps to 0).
    pub fn new(stale_after_days: i64) -> Self {
        let stale_after = TimeDelta::try_days(stale_after_days.max(0)).unwrap_or(TimeDelta::MAX);
        Self { stale_after }
    }

    pub fn stale_after(&self) -> TimeDelta {
        self.stale_after
    }

    /// Status from shape and age alone, ignoring overrides.
    pub fn derive(&self, conversation: &Conversation, now: DateTime<Utc>) -> FlagStatus {
        if now - conversation.first_timestamp > self.stale_after {
            FlagStatus::Complete
        } else if !conversation.has_role(&MessageRole::User)
            || !conversation.has_role(&MessageRole::Assistant)
        {
            FlagStatus::Incomplete
        } else {
            FlagStatus::Pending
        }
    }

    /// Effective status: the override if present, else [`derive`](Self::derive).
    pub fn classify(
        &self,
        conversation: &Conversation,
        overrides: &OverrideTable,
        now: DateTime<Utc>,
    ) -> FlagStatus {
        match overrides.get(&conversation.session_id) {
            Some(record) => record.flag_status,
            None => self.derive(conversation, now),
        }
    }

    /// Attach derived and effective status to a conversation.
    pub fn resolve(
        &self,
        conversation: Conversation,
        overrides: &OverrideTable,
        now: DateTime<Utc>,
    ) -> ResolvedConversation {
        let derived_status = self.derive(&conversation, now);
        let (effective_status, overridden) = match overrides.get(&conversation.session_id) {
            Some(record) => (record.flag_status, true),
            None => (derived_status, false),
        };
        ResolvedConversation {
            conversation,
            derived_status,
            effective_status,
            overridden,
        }
    }

    pub fn resolve_all(
        &self,
        conversations: Vec<Conversation>,
        overrides: &OverrideTable,
        now: DateTime<Utc>,
    ) -> Vec<ResolvedConversation> {
        conversations
            .into_iter()
            .map(|c| self.resolve(c, overrides, now))
            .collect()
    }
}

impl Default for StatusResolver {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER_DAYS)
    }
}

/// Validate operator input against the three-valued status enum.
pub fn parse_flag_status(input: &str) -> Result<FlagStatus, DashboardError> {
    input
        .parse()
        .map_err(|_| DashboardError::InvalidStatus(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscope_types::message::ChatMessage;
    use chatscope_types::status::StatusOverride;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn message(role: MessageRole, secs: i64) -> ChatMessage {
        ChatMessage {
            session_id: "s1".to_string(),
            role,
            content: "text".to_string(),
            timestamp: t0() + TimeDelta::seconds(secs),
        }
    }

    fn conversation(messages: Vec<ChatMessage>) -> Conversation {
        let first = messages.first().unwrap().timestamp;
        let last = messages.last().unwrap().timestamp;
        Conversation {
            session_id: "s1".to_string(),
            message_count: messages.len() as u32,
            messages,
            malformed: Vec::new(),
            first_timestamp: first,
            last_timestamp: last,
            duration_seconds: (last - first).num_seconds() as u64,
        }
    }

    fn full() -> Conversation {
        conversation(vec![
            message(MessageRole::User, 0),
            message(MessageRole::Assistant, 90),
        ])
    }

    fn overrides_with(status: FlagStatus) -> OverrideTable {
        let mut table = OverrideTable::new();
        table.insert(
            "s1".to_string(),
            StatusOverride {
                session_id: "s1".to_string(),
                flag_status: status,
                created_at: t0(),
                updated_at: t0(),
            },
        );
        table
    }

    #[test]
    fn test_recent_conversation_is_pending() {
        let resolver = StatusResolver::default();
        let now = t0() + TimeDelta::seconds(100);
        assert_eq!(
            resolver.classify(&full(), &OverrideTable::new(), now),
            FlagStatus::Pending
        );
    }

    #[test]
    fn test_eight_days_later_is_complete() {
        let resolver = StatusResolver::default();
        let now = t0() + TimeDelta::days(8);
        assert_eq!(
            resolver.classify(&full(), &OverrideTable::new(), now),
            FlagStatus::Complete
        );
    }

    #[test]
    fn test_exactly_seven_days_is_not_stale() {
        let resolver = StatusResolver::default();
        let now = t0() + TimeDelta::days(7);
        assert_eq!(resolver.derive(&full(), now), FlagStatus::Pending);
        let later = now + TimeDelta::seconds(1);
        assert_eq!(resolver.derive(&full(), later), FlagStatus::Complete);
    }

    #[test]
    fn test_missing_role_is_incomplete() {
        let resolver = StatusResolver::default();
        let user_only = conversation(vec![message(MessageRole::User, 0)]);
        let now = t0() + TimeDelta::hours(1);
        assert_eq!(resolver.derive(&user_only, now), FlagStatus::Incomplete);
    }

    #[test]
    fn test_age_rule_precedes_missing_role() {
        let resolver = StatusResolver::default();
        let user_only = conversation(vec![message(MessageRole::User, 0)]);
        let now = t0() + TimeDelta::days(30);
        assert_eq!(resolver.derive(&user_only, now), FlagStatus::Complete);
    }

    #[test]
    fn test_override_wins_regardless_of_age() {
        let resolver = StatusResolver::default();
        let overrides = overrides_with(FlagStatus::Pending);
        let ancient = t0() + TimeDelta::days(365);
        assert_eq!(
            resolver.classify(&full(), &overrides, ancient),
            FlagStatus::Pending
        );
    }

    #[test]
    fn test_override_wins_regardless_of_shape() {
        let resolver = StatusResolver::default();
        let user_only = conversation(vec![message(MessageRole::User, 0)]);
        let overrides = overrides_with(FlagStatus::Complete);
        assert_eq!(
            resolver.classify(&user_only, &overrides, t0()),
            FlagStatus::Complete
        );
    }

    #[test]
    fn test_resolve_keeps_derived_alongside_override() {
        let resolver = StatusResolver::default();
        let overrides = overrides_with(FlagStatus::Incomplete);
        let resolved = resolver.resolve(full(), &overrides, t0() + TimeDelta::days(10));
        assert_eq!(resolved.derived_status, FlagStatus::Complete);
        assert_eq!(resolved.effective_status, FlagStatus::Incomplete);
        assert!(resolved.overridden);
    }

    #[test]
    fn test_custom_threshold() {
        let resolver = StatusResolver::new(1);
        let now = t0() + TimeDelta::days(2);
        assert_eq!(resolver.derive(&full(), now), FlagStatus::Complete);
        assert_eq!(StatusResolver::new(-5).stale_after(), TimeDelta::zero());
    }

    #[test]
    fn test_parse_flag_status() {
        assert_eq!(parse_flag_status("complete").unwrap(), FlagStatus::Complete);
        let err = parse_flag_status("archived").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidStatus(s) if s == "archived"));
    }
}
