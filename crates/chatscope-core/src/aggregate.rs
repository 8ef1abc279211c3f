//! Aggregation engine: groups raw messages into conversations.
//!
//! One pass over the store's messages builds a session-id → messages map.
//! Each group is then sorted (stable, so timestamp ties keep store order),
//! filtered for visibility and measured.
//!
//! A session is only surfaced when it holds at least one `user` and one
//! `assistant` message with a parseable timestamp. Messages whose timestamp
//! fails to parse are kept on the conversation as `malformed`: they count
//! toward `message_count` but take no part in ordering, duration or the
//! visibility check.

use std::collections::HashMap;

use chatscope_types::conversation::Conversation;
use chatscope_types::message::{ChatMessage, MalformedMessage, MessageRole, RawMessage};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

/// Counters describing one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub input_messages: usize,
    /// Messages with a blank session id; they belong to no group.
    pub unattributed_messages: usize,
    pub malformed_messages: usize,
    pub sessions_seen: usize,
    /// Sessions dropped by the visibility filter.
    pub sessions_hidden: usize,
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 (`2025-06-01T12:00:00Z`, `2025-06-01T14:00:00+02:00`)
/// and offset-less `YYYY-MM-DD HH:MM:SS[.fff]` / `YYYY-MM-DDTHH:MM:SS[.fff]`,
/// which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| e.to_string())
}

/// Group `messages` into visible conversations, in first-seen session order.
pub fn aggregate(messages: &[RawMessage]) -> Vec<Conversation> {
    aggregate_with_report(messages).0
}

/// [`aggregate`], also returning the pass counters.
pub fn aggregate_with_report(messages: &[RawMessage]) -> (Vec<Conversation>, AggregationReport) {
    let mut report = AggregationReport {
        input_messages: messages.len(),
        ..AggregationReport::default()
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SessionGroup> = Vec::new();

    for raw in messages {
        if raw.session_id.trim().is_empty() {
            report.unattributed_messages += 1;
            continue;
        }

        let slot = *index.entry(raw.session_id.as_str()).or_insert_with(|| {
            groups.push(SessionGroup::new(&raw.session_id));
            groups.len() - 1
        });

        match parse_timestamp(&raw.timestamp) {
            Ok(timestamp) => groups[slot].timed.push(ChatMessage {
                session_id: raw.session_id.clone(),
                role: raw.role.clone(),
                content: raw.content.clone(),
                timestamp,
            }),
            Err(reason) => {
                warn!(
                    session_id = %raw.session_id,
                    raw_timestamp = %raw.timestamp,
                    %reason,
                    "Excluding message with malformed timestamp from ordering"
                );
                report.malformed_messages += 1;
                groups[slot].malformed.push(MalformedMessage {
                    session_id: raw.session_id.clone(),
                    role: raw.role.clone(),
                    content: raw.content.clone(),
                    raw_timestamp: raw.timestamp.clone(),
                    reason,
                });
            }
        }
    }

    report.sessions_seen = groups.len();

    let conversations: Vec<Conversation> =
        groups.into_iter().filter_map(SessionGroup::into_conversation).collect();

    report.sessions_hidden = report.sessions_seen - conversations.len();

    debug!(
        input_messages = report.input_messages,
        sessions_seen = report.sessions_seen,
        sessions_hidden = report.sessions_hidden,
        malformed_messages = report.malformed_messages,
        "Aggregation pass finished"
    );

    (conversations, report)
}

struct SessionGroup {
    session_id: String,
    timed: Vec<ChatMessage>,
    malformed: Vec<MalformedMessage>,
}

impl SessionGroup {
    fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            timed: Vec::new(),
            malformed: Vec::new(),
        }
    }

    /// Sort, apply the visibility filter and measure. `None` hides the session.
    fn into_conversation(self) -> Option<Conversation> {
        let SessionGroup {
            session_id,
            mut timed,
            malformed,
        } = self;

        // sort_by_key is stable: equal timestamps keep arrival order.
        timed.sort_by_key(|m| m.timestamp);

        let has_user = timed.iter().any(|m| m.role == MessageRole::User);
        let has_assistant = timed.iter().any(|m| m.role == MessageRole::Assistant);
        if !(has_user && has_assistant) {
            debug!(session_id = %session_id, "Hiding session without both user and assistant messages");
            return None;
        }

        let first_timestamp = timed.first()?.timestamp;
        let last_timestamp = timed.last()?.timestamp;
        let duration_seconds = (last_timestamp - first_timestamp).num_seconds().max(0) as u64;
        let message_count = (timed.len() + malformed.len()) as u32;

        Some(Conversation {
            session_id,
            messages: timed,
            malformed,
            message_count,
            first_timestamp,
            last_timestamp,
            duration_seconds,
        })
    }
}
