//! Search/filter projection over resolved conversations.
//!
//! Rows are ordered newest-first by the conversation's first message and
//! numbered before filtering, so a row keeps its display identifier
//! (`001`, `002`, ...) whatever the query. The projection borrows the
//! conversations it shows; it cannot change them.

use chatscope_types::conversation::ResolvedConversation;
use serde::Serialize;

/// One projected row.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationRow<'a> {
    pub display_id: String,
    #[serde(flatten)]
    pub conversation: &'a ResolvedConversation,
}

impl ConversationRow<'_> {
    /// Case-insensitive substring match; `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        let conv = &self.conversation.conversation;
        contains(&self.display_id, needle)
            || contains(&conv.session_id, needle)
            || conv
                .messages
                .iter()
                .any(|m| contains(&m.content, needle) || contains(m.role.as_str(), needle))
            || conv
                .malformed
                .iter()
                .any(|m| contains(&m.content, needle) || contains(m.role.as_str(), needle))
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Zero-padded, 1-based display identifier for a recency position.
pub fn display_id(position: usize) -> String {
    format!("{:03}", position + 1)
}

/// Sort newest-first, number, then keep rows matching `query`.
///
/// An empty or whitespace-only query keeps every row. Matching is plain
/// substring against the display id, the session id and the content and
/// role of every message the conversation holds, including ones with an
/// unreadable timestamp; results stay in recency order.
pub fn project<'a>(
    conversations: &'a [ResolvedConversation],
    query: &str,
) -> Vec<ConversationRow<'a>> {
    let mut ordered: Vec<&ResolvedConversation> = conversations.iter().collect();
    ordered.sort_by(|a, b| {
        b.conversation
            .first_timestamp
            .cmp(&a.conversation.first_timestamp)
            .then_with(|| a.session_id().cmp(b.session_id()))
    });

    let needle = query.trim().to_lowercase();

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, conversation)| ConversationRow {
            display_id: display_id(position),
            conversation,
        })
        .filter(|row| needle.is_empty() || row.matches(&needle))
        .collect()
}
