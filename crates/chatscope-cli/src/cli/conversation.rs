//! Conversation browsing commands: list and show.

use anyhow::{bail, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatscope_core::present::{format_duration, strip_markup};
use chatscope_core::projection::ConversationRow;
use chatscope_types::conversation::ResolvedConversation;
use chatscope_types::message::MessageRole;
use chatscope_types::status::FlagStatus;

use crate::state::AppState;

const PREVIEW_CHARS: usize = 48;

/// List conversations newest-first, optionally filtered by `query`.
///
/// # Examples
///
/// ```bash
/// chatscope list
/// chatscope list --query "token limit" --json
/// ```
pub async fn list_conversations(state: &AppState, query: Option<&str>, json: bool) -> Result<()> {
    let dashboard = state.service.refresh().await?;
    let rows = dashboard.rows(query.unwrap_or(""));

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        match query {
            Some(q) if !q.trim().is_empty() => println!(
                "  {} No conversations match '{}'.",
                style("i").blue().bold(),
                style(q).cyan()
            ),
            _ => println!(
                "  {} No conversations yet. Load some with: {}",
                style("i").blue().bold(),
                style("chatscope import <file.json>").yellow()
            ),
        }
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Duration").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("First message").fg(Color::White),
    ]);

    for row in &rows {
        table.add_row(table_row(row));
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} conversation(s); {} shown",
        dashboard.conversations.len(),
        rows.len()
    );
    println!();

    Ok(())
}

fn table_row(row: &ConversationRow<'_>) -> Vec<Cell> {
    let resolved = row.conversation;
    let conv = &resolved.conversation;

    let status = if resolved.overridden {
        format!("{}*", resolved.effective_status)
    } else {
        resolved.effective_status.to_string()
    };

    vec![
        Cell::new(&row.display_id),
        Cell::new(conv.first_timestamp.format("%Y-%m-%d %H:%M").to_string()),
        Cell::new(format_duration(conv.duration_seconds)),
        Cell::new(conv.message_count),
        Cell::new(status).fg(status_color(resolved.effective_status)),
        Cell::new(preview(resolved)),
    ]
}

fn status_color(status: FlagStatus) -> Color {
    match status {
        FlagStatus::Pending => Color::Yellow,
        FlagStatus::Incomplete => Color::Red,
        FlagStatus::Complete => Color::Green,
    }
}

/// First user message, markup stripped, cut to a single short line.
fn preview(resolved: &ResolvedConversation) -> String {
    let text = resolved
        .conversation
        .messages
        .iter()
        .find(|m| m.role == MessageRole::User)
        .map(|m| strip_markup(&m.content))
        .unwrap_or_default();
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        line
    }
}

/// Show one conversation by session id or display id.
pub async fn show_conversation(state: &AppState, session: &str, json: bool) -> Result<()> {
    let Some(resolved) = find_conversation(state, session).await? else {
        bail!("No visible conversation for '{session}'");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    let conv = &resolved.conversation;

    println!();
    println!(
        "  {} {}",
        style("Session").bold(),
        style(&conv.session_id).cyan()
    );
    println!(
        "  Started:  {}",
        conv.first_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Duration: {}", format_duration(conv.duration_seconds));
    println!("  Messages: {}", conv.message_count);
    print!(
        "  Status:   {}",
        style(resolved.effective_status).fg(console_color(resolved.effective_status))
    );
    if resolved.overridden {
        print!(
            " {}",
            style(format!("(flagged; derived {})", resolved.derived_status)).dim()
        );
    }
    println!();
    println!();

    for message in &conv.messages {
        let role = match message.role {
            MessageRole::User => style(message.role.as_str()).blue().bold(),
            MessageRole::Assistant => style(message.role.as_str()).green().bold(),
            MessageRole::Other(_) => style(message.role.as_str()).dim(),
        };
        println!(
            "  {} {}",
            style(message.timestamp.format("%H:%M:%S")).dim(),
            role
        );
        for line in strip_markup(&message.content).lines() {
            println!("    {line}");
        }
        println!();
    }

    if !conv.malformed.is_empty() {
        println!("  {}", style("── Unreadable timestamps ──").dim());
        for bad in &conv.malformed {
            println!(
                "  {} {} {}",
                style("!").yellow().bold(),
                bad.role,
                style(format!("'{}': {}", bad.raw_timestamp, bad.reason)).dim()
            );
        }
        println!();
    }

    Ok(())
}

/// Look `key` up as a session id first, then as a display id.
async fn find_conversation(state: &AppState, key: &str) -> Result<Option<ResolvedConversation>> {
    let now = chrono::Utc::now();
    if let Some(found) = state.service.conversation_at(key, now).await? {
        return Ok(Some(found));
    }

    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        let dashboard = state.service.refresh_at(now).await?;
        let wanted = normalize_display_id(key);
        return Ok(dashboard
            .rows("")
            .into_iter()
            .find(|row| row.display_id == wanted)
            .map(|row| row.conversation.clone()));
    }

    Ok(None)
}

/// `"3"` and `"003"` both name the third row.
fn normalize_display_id(key: &str) -> String {
    let trimmed = key.trim_start_matches('0');
    format!("{trimmed:0>3}")
}

fn console_color(status: FlagStatus) -> console::Color {
    match status {
        FlagStatus::Pending => console::Color::Yellow,
        FlagStatus::Incomplete => console::Color::Red,
        FlagStatus::Complete => console::Color::Green,
    }
}
