//! Operator status override command.

use anyhow::Result;
use console::style;

use chatscope_types::conversation::ResolvedConversation;
use chatscope_types::error::DashboardError;

use crate::state::AppState;

/// Persist `status` for `session`.
///
/// The status string is validated by the service before anything is
/// written; an invalid value leaves the store untouched. Once the write is
/// confirmed the command succeeds, even if the follow-up visibility read
/// fails.
pub async fn flag_conversation(
    state: &AppState,
    session: &str,
    status: &str,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let outcome = state.service.set_override(session, status).await?;
    let visible = visibility(
        session,
        state
            .service
            .conversation_at(session, outcome.record.updated_at)
            .await,
    );

    if json {
        let result = serde_json::json!({
            "matched_existing": outcome.matched_existing,
            "visible": visible,
            "record": outcome.record,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    let verb = if outcome.matched_existing {
        "Updated"
    } else {
        "Flagged"
    };
    println!();
    println!(
        "  {} {} '{}' as {}",
        style("✓").green().bold(),
        verb,
        style(session).cyan(),
        style(outcome.record.flag_status).bold()
    );
    match visible {
        Some(true) => {}
        Some(false) => println!(
            "  {} No visible conversation has this session id yet; the status is stored anyway.",
            style("!").yellow().bold()
        ),
        None => println!(
            "  {} Status stored, but the conversation could not be re-read.",
            style("!").yellow().bold()
        ),
    }
    println!();

    Ok(())
}

/// Whether the flagged session is visible; `None` when the read failed.
fn visibility(
    session: &str,
    lookup: Result<Option<ResolvedConversation>, DashboardError>,
) -> Option<bool> {
    match lookup {
        Ok(found) => Some(found.is_some()),
        Err(e) => {
            tracing::warn!(session_id = %session, error = %e, "Status saved but visibility check failed");
            None
        }
    }
}
