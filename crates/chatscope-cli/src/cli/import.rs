//! Message import command.
//!
//! Appends messages from a JSON file to the message store. Timestamps are
//! stored verbatim; unparseable ones surface later as malformed messages
//! rather than failing the import.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use chatscope_types::message::RawMessage;

use crate::state::AppState;

/// Parse a JSON array of messages.
pub fn parse_messages(content: &str) -> Result<Vec<RawMessage>> {
    serde_json::from_str(content).context("Expected a JSON array of {session_id, role, content, timestamp} objects")
}

pub async fn import_messages(state: &AppState, file: &Path, json: bool, quiet: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let messages = parse_messages(&content)?;

    let blank = messages
        .iter()
        .filter(|m| m.session_id.trim().is_empty())
        .count();
    if blank > 0 {
        tracing::warn!(blank, "Importing messages without a session id; they will not be grouped");
    }

    let imported = state
        .service
        .message_store()
        .append_messages(&messages)
        .await
        .context("Failed to store messages")?;

    if json {
        let result = serde_json::json!({
            "imported": imported,
            "without_session_id": blank,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Imported {} message(s) from {}",
            style("✓").green().bold(),
            style(imported).bold(),
            style(file.display()).cyan()
        );
        if blank > 0 {
            println!(
                "  {} {} message(s) had no session id",
                style("!").yellow().bold(),
                blank
            );
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscope_types::message::MessageRole;

    #[test]
    fn test_parse_messages() {
        let content = r#"[
            {"session_id": "s1", "role": "user", "content": "hi", "timestamp": "2025-06-01T12:00:00Z"},
            {"session_id": "s1", "role": "tool", "content": "{}", "timestamp": "yesterday"}
        ]"#;
        let messages = parse_messages(content).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Other("tool".to_string()));
        assert_eq!(messages[1].timestamp, "yesterday");
    }

    #[test]
    fn test_parse_messages_rejects_object() {
        assert!(parse_messages(r#"{"session_id": "s1"}"#).is_err());
    }

    #[tokio::test]
    async fn test_import_into_temporary_database() {
        use chatscope_types::config::DashboardConfig;

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path().to_path_buf(), DashboardConfig::default())
            .await
            .unwrap();

        let file = dir.path().join("history.json");
        tokio::fs::write(
            &file,
            r#"[
                {"session_id": "s1", "role": "user", "content": "hi", "timestamp": "2025-06-01T12:00:00Z"},
                {"session_id": "s1", "role": "assistant", "content": "hello", "timestamp": "2025-06-01T12:01:30Z"},
                {"session_id": "s2", "role": "user", "content": "anyone?", "timestamp": "2025-06-01T13:00:00Z"},
                {"session_id": "", "role": "user", "content": "orphan", "timestamp": "2025-06-01T13:00:00Z"}
            ]"#,
        )
        .await
        .unwrap();

        import_messages(&state, &file, false, true).await.unwrap();

        let store = state.service.message_store();
        assert_eq!(store.count_messages().await.unwrap(), 4);

        let dashboard = state.service.refresh().await.unwrap();
        assert_eq!(dashboard.conversations.len(), 1);
        let s1 = dashboard.get("s1").unwrap();
        assert_eq!(s1.conversation.duration_seconds, 90);
        assert_eq!(dashboard.report.unattributed_messages, 1);
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        use chatscope_types::config::DashboardConfig;

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init(dir.path().to_path_buf(), DashboardConfig::default())
            .await
            .unwrap();
        let result = import_messages(&state, &dir.path().join("missing.json"), false, true).await;
        assert!(result.is_err());
    }
}
