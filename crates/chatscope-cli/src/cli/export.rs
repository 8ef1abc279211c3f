//! Completed-conversation export command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use chatscope_core::export::build_export;
use chatscope_infra::filesystem::write_file;
use chatscope_types::config::DateRange;

use crate::state::AppState;

/// Write every complete conversation to a JSON document.
///
/// Nothing is written when no conversation is complete.
pub async fn export_completed(
    state: &AppState,
    range: Option<DateRange>,
    out: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let range = range.unwrap_or(state.config.date_range);
    let dashboard = state.service.refresh().await?;
    let export = build_export(&dashboard, range);

    if export.is_empty() {
        if json {
            let result = serde_json::json!({ "written": false, "conversations": 0 });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if !quiet {
            println!();
            println!(
                "  {} No completed conversations to export.",
                style("i").blue().bold()
            );
            println!();
        }
        return Ok(());
    }

    let path = out.unwrap_or_else(|| state.data_dir.join("exports").join(&export.file_name));
    let body = serde_json::to_string_pretty(&export)?;
    write_file(&path, &body)
        .await
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        conversations = export.transcripts.len(),
        "Exported completed conversations"
    );

    if json {
        let result = serde_json::json!({
            "written": true,
            "path": path.display().to_string(),
            "title": export.title,
            "conversations": export.transcripts.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !quiet {
        println!();
        println!(
            "  {} Exported {} conversation(s): {}",
            style("✓").green().bold(),
            style(export.transcripts.len()).bold(),
            style(&export.title).dim()
        );
        println!("  {}", style(path.display()).cyan());
        println!();
    }

    Ok(())
}
