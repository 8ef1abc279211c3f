//! Email notification list subcommands: list, add, toggle, export.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatscope_infra::filesystem::write_file;
use chatscope_types::subscription::EmailSubscription;

use crate::state::AppState;

const EXPORT_FILE_NAME: &str = "email-subscriptions.json";

#[derive(Subcommand)]
pub enum SubscriberCommand {
    /// List addresses, newest first.
    List,

    /// Add an address, or update it if already listed.
    Add {
        /// Email address (stored trimmed and lowercased).
        email: String,

        /// Record the address as unsubscribed.
        #[arg(long)]
        unsubscribed: bool,
    },

    /// Flip an address between subscribed and unsubscribed.
    Toggle {
        /// Email address already on the list.
        email: String,
    },

    /// Write the list to a JSON file.
    Export {
        /// Output path (defaults to `{data_dir}/exports/email-subscriptions.json`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Handle a subscribers subcommand.
pub async fn handle_subscriber_command(
    cmd: SubscriberCommand,
    state: &AppState,
    json: bool,
    quiet: bool,
) -> Result<()> {
    match cmd {
        SubscriberCommand::List => list_subscribers(state, json).await,
        SubscriberCommand::Add { email, unsubscribed } => {
            add_subscriber(state, &email, !unsubscribed, json, quiet).await
        }
        SubscriberCommand::Toggle { email } => toggle_subscriber(state, &email, json, quiet).await,
        SubscriberCommand::Export { out } => export_subscribers(state, out, json, quiet).await,
    }
}

async fn list_subscribers(state: &AppState, json: bool) -> Result<()> {
    let subscriptions = state.subscriptions.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&subscriptions)?);
        return Ok(());
    }

    if subscriptions.is_empty() {
        println!();
        println!(
            "  {} No email subscriptions. Add one with: {}",
            style("i").blue().bold(),
            style("chatscope subscribers add <email>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Email").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Added").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for sub in &subscriptions {
        let (label, color) = status_label(sub);
        table.add_row(vec![
            Cell::new(&sub.email),
            Cell::new(label).fg(color),
            Cell::new(sub.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(sub.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    let active = subscriptions.iter().filter(|s| s.is_subscribed).count();
    println!();
    println!("{table}");
    println!();
    println!("  {} address(es); {} subscribed", subscriptions.len(), active);
    println!();

    Ok(())
}

fn status_label(sub: &EmailSubscription) -> (&'static str, Color) {
    if sub.is_subscribed {
        ("Subscribed", Color::Green)
    } else {
        ("Unsubscribed", Color::DarkGrey)
    }
}

async fn add_subscriber(
    state: &AppState,
    email: &str,
    is_subscribed: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let outcome = state.subscriptions.subscribe(email, Some(is_subscribed)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !quiet {
        let verb = if outcome.matched_existing {
            "Updated"
        } else {
            "Added"
        };
        println!();
        println!(
            "  {} {} {} ({})",
            style("✓").green().bold(),
            verb,
            style(&outcome.record.email).cyan(),
            status_label(&outcome.record).0.to_lowercase()
        );
        println!();
    }

    Ok(())
}

async fn toggle_subscriber(state: &AppState, email: &str, json: bool, quiet: bool) -> Result<()> {
    let outcome = state.subscriptions.toggle(email).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !quiet {
        println!();
        println!(
            "  {} {} is now {}",
            style("✓").green().bold(),
            style(&outcome.record.email).cyan(),
            status_label(&outcome.record).0.to_lowercase()
        );
        println!();
    }

    Ok(())
}

async fn export_subscribers(
    state: &AppState,
    out: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let subscriptions = state.subscriptions.list().await?;
    let path = out.unwrap_or_else(|| state.data_dir.join("exports").join(EXPORT_FILE_NAME));

    write_file(&path, &serde_json::to_string_pretty(&subscriptions)?)
        .await
        .with_context(|| format!("Failed to write subscriptions to {}", path.display()))?;

    if json {
        let result = serde_json::json!({
            "path": path.display().to_string(),
            "subscriptions": subscriptions.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Exported {} subscription(s)",
            style("✓").green().bold(),
            style(subscriptions.len()).bold()
        );
        println!("  {}", style(path.display()).cyan());
        println!();
    }

    Ok(())
}
