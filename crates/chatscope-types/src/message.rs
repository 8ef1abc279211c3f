//! Chat message types as read from the message store.
//!
//! The store hands out [`RawMessage`]s whose timestamp is still the stored
//! text. The aggregation engine parses it into a [`ChatMessage`]; messages
//! whose timestamp cannot be parsed become [`MalformedMessage`]s instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Author role of a chat message.
///
/// Only `user` and `assistant` carry meaning for classification. Any other
/// stored value (`system`, `tool`, ...) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageRole {
    User,
    Assistant,
    Other(String),
}

impl MessageRole {
    pub fn as_str(&self) -> &str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Other(role) => role,
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            _ => MessageRole::Other(s.to_string()),
        })
    }
}

impl From<String> for MessageRole {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

impl From<MessageRole> for String {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

/// A message exactly as stored, before timestamp parsing.
///
/// Store order (the order a `Vec<RawMessage>` is returned in) is the
/// arrival order used to break timestamp ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
}

/// A message whose timestamp parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub session_id: String,
    pub role: MessageRole,
    /// Message body; may embed markup.
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A message whose timestamp could not be parsed.
///
/// Carried alongside its conversation rather than returned as an `Err`:
/// one bad record never fails an aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("malformed message in session '{session_id}': timestamp '{raw_timestamp}': {reason}")]
pub struct MalformedMessage {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub raw_timestamp: String,
    pub reason: String,
}
