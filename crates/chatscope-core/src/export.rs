//! Completed-conversation export.
//!
//! Selects every conversation whose effective status is `complete` and
//! turns it into a transcript: one sheet per session, rows ascending by
//! timestamp, markup stripped from the content. Messages with an unreadable
//! timestamp follow the timed rows in store order, carrying the stored text.

use chatscope_types::config::DateRange;
use chatscope_types::conversation::ResolvedConversation;
use chatscope_types::status::FlagStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::Dashboard;
use crate::present::{strip_markup, ReportWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptRow {
    /// RFC 3339 for timed messages; the stored text for malformed ones.
    pub timestamp: String,
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub session_id: String,
    /// `Session-` followed by the first eight characters of the session id.
    pub sheet_name: String,
    pub rows: Vec<TranscriptRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedExport {
    pub title: String,
    pub file_name: String,
    pub generated_at: DateTime<Utc>,
    pub transcripts: Vec<Transcript>,
}

impl CompletedExport {
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

pub fn sheet_name(session_id: &str) -> String {
    let prefix: String = session_id.chars().take(8).collect();
    format!("Session-{prefix}")
}

pub fn transcript(conversation: &ResolvedConversation) -> Transcript {
    let conv = &conversation.conversation;
    Transcript {
        session_id: conv.session_id.clone(),
        sheet_name: sheet_name(&conv.session_id),
        rows: conv
            .messages
            .iter()
            .map(|m| TranscriptRow {
                timestamp: m.timestamp.to_rfc3339(),
                role: m.role.to_string(),
                content: strip_markup(&m.content),
            })
            .chain(conv.malformed.iter().map(|m| TranscriptRow {
                timestamp: m.raw_timestamp.clone(),
                role: m.role.to_string(),
                content: strip_markup(&m.content),
            }))
            .collect(),
    }
}

/// Transcripts of all complete conversations, newest conversation first.
pub fn completed_transcripts(dashboard: &Dashboard) -> Vec<Transcript> {
    dashboard
        .rows("")
        .into_iter()
        .filter(|row| row.conversation.effective_status == FlagStatus::Complete)
        .map(|row| transcript(row.conversation))
        .collect()
}

/// Build the full export document for `range`, titled relative to the
/// dashboard's evaluation date.
pub fn build_export(dashboard: &Dashboard, range: DateRange) -> CompletedExport {
    let window = ReportWindow::new(range, dashboard.evaluated_at.date_naive());
    CompletedExport {
        title: window.title(),
        file_name: window.export_file_name(),
        generated_at: dashboard.evaluated_at,
        transcripts: completed_transcripts(dashboard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StatusResolver;
    use chatscope_types::message::RawMessage;
    use chatscope_types::status::{OverrideTable, StatusOverride};
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn raw(session: &str, role: &str, content: &str, secs: i64) -> RawMessage {
        RawMessage {
            session_id: session.to_string(),
            role: role.parse().unwrap(),
            content: content.to_string(),
            timestamp: (t0() + TimeDelta::seconds(secs)).to_rfc3339(),
        }
    }

    fn dashboard() -> Dashboard {
        let messages = vec![
            raw("0123456789abcdef", "assistant", "<p>Sure, <i>done</i>.</p>", 20),
            raw("0123456789abcdef", "user", "Please close my ticket", 10),
            raw("fresh-session", "user", "hi", 5 * 86_400),
            raw("fresh-session", "assistant", "hello", 5 * 86_400 + 1),
            raw("flagged", "user", "q", 6 * 86_400),
            raw("flagged", "assistant", "a", 6 * 86_400 + 1),
        ];
        let mut overrides = OverrideTable::new();
        overrides.insert(
            "flagged".to_string(),
            StatusOverride {
                session_id: "flagged".to_string(),
                flag_status: FlagStatus::Complete,
                created_at: t0(),
                updated_at: t0(),
            },
        );
        // "0123..." is 9 days old by now; "fresh-session" is 4 days old.
        Dashboard::build(
            &messages,
            overrides,
            &StatusResolver::default(),
            t0() + TimeDelta::days(9),
        )
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(sheet_name("0123456789abcdef"), "Session-01234567");
        assert_eq!(sheet_name("abc"), "Session-abc");
    }

    #[test]
    fn test_completed_transcripts_selects_effective_complete() {
        let transcripts = completed_transcripts(&dashboard());
        let ids: Vec<&str> = transcripts.iter().map(|t| t.session_id.as_str()).collect();
        assert_eq!(ids, vec!["flagged", "0123456789abcdef"]);
    }

    #[test]
    fn test_transcript_rows_sorted_and_stripped() {
        let transcripts = completed_transcripts(&dashboard());
        let aged = transcripts
            .iter()
            .find(|t| t.session_id == "0123456789abcdef")
            .unwrap();
        assert_eq!(aged.sheet_name, "Session-01234567");
        assert_eq!(aged.rows.len(), 2);
        assert_eq!(aged.rows[0].role, "user");
        assert_eq!(aged.rows[1].content, "Sure, done.");
        assert_eq!(aged.rows[0].timestamp, (t0() + TimeDelta::seconds(10)).to_rfc3339());
        assert_eq!(aged.rows[1].timestamp, (t0() + TimeDelta::seconds(20)).to_rfc3339());
    }

    #[test]
    fn test_transcript_appends_malformed_rows() {
        let mut messages = vec![
            raw("late-night", "user", "Still there?", 0),
            raw("late-night", "assistant", "Yes", 5),
        ];
        messages.push(RawMessage {
            session_id: "late-night".to_string(),
            role: "assistant".parse().unwrap(),
            content: "<i>token limit reached</i>".to_string(),
            timestamp: "garbage".to_string(),
        });
        let dash = Dashboard::build(
            &messages,
            OverrideTable::new(),
            &StatusResolver::default(),
            t0() + TimeDelta::days(9),
        );

        let transcripts = completed_transcripts(&dash);
        assert_eq!(transcripts.len(), 1);
        let rows = &transcripts[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].content, "Still there?");
        assert_eq!(rows[2].timestamp, "garbage");
        assert_eq!(rows[2].role, "assistant");
        assert_eq!(rows[2].content, "token limit reached");
    }

    #[test]
    fn test_build_export_metadata() {
        let export = build_export(&dashboard(), DateRange::Last7Days);
        assert_eq!(export.title, "Conversations From 2025-06-03 to 2025-06-10");
        assert_eq!(
            export.file_name,
            "completed-conversations-2025-06-03-to-2025-06-10.json"
        );
        assert!(!export.is_empty());
    }
}
