//! Derived conversation records.
//!
//! Conversations are never persisted. They are rebuilt from the message
//! store on every refresh pass and resolved against the override table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, MalformedMessage, MessageRole};
use crate::status::FlagStatus;

/// All messages sharing one session id, after the visibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: String,
    /// Timed messages, ascending by timestamp; ties keep store order.
    pub messages: Vec<ChatMessage>,
    /// Messages whose timestamp failed to parse, in store order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<MalformedMessage>,
    /// Timed plus malformed messages.
    pub message_count: u32,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    /// Whole seconds between the first and last timed message.
    pub duration_seconds: u64,
}

impl Conversation {
    /// Whether any timed message was written by `role`.
    pub fn has_role(&self, role: &MessageRole) -> bool {
        self.messages.iter().any(|m| &m.role == role)
    }
}

/// A conversation with its status resolved for one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConversation {
    #[serde(flatten)]
    pub conversation: Conversation,
    /// Status computed from shape and age alone.
    pub derived_status: FlagStatus,
    /// The override if one exists, else `derived_status`.
    pub effective_status: FlagStatus,
    pub overridden: bool,
}

impl ResolvedConversation {
    pub fn session_id(&self) -> &str {
        &self.conversation.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        let t0 = DateTime::parse_from_rfc3339("2025-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Conversation {
            session_id: "s1".to_string(),
            messages: vec![ChatMessage {
                session_id: "s1".to_string(),
                role: MessageRole::User,
                content: "hello".to_string(),
                timestamp: t0,
            }],
            malformed: Vec::new(),
            message_count: 1,
            first_timestamp: t0,
            last_timestamp: t0,
            duration_seconds: 0,
        }
    }

    #[test]
    fn test_has_role() {
        let conv = sample();
        assert!(conv.has_role(&MessageRole::User));
        assert!(!conv.has_role(&MessageRole::Assistant));
    }

    #[test]
    fn test_resolved_conversation_flattens() {
        let resolved = ResolvedConversation {
            conversation: sample(),
            derived_status: FlagStatus::Pending,
            effective_status: FlagStatus::Complete,
            overridden: true,
        };
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["effective_status"], "complete");
        assert!(json.get("malformed").is_none());
        assert_eq!(resolved.session_id(), "s1");
    }
}
