//! Dashboard summary command.

use anyhow::Result;
use console::style;

use chatscope_core::present::ReportWindow;

use crate::state::AppState;

/// Display conversation counts per effective status plus data-quality
/// counters from the last aggregation.
pub async fn summary(state: &AppState, json: bool) -> Result<()> {
    let dashboard = state.service.refresh().await?;
    let stored = state.service.message_store().count_messages().await?;
    let counts = dashboard.summary();
    let window = ReportWindow::new(state.config.date_range, dashboard.evaluated_at.date_naive());

    if json {
        let summary = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "title": window.title(),
            "evaluated_at": dashboard.evaluated_at,
            "stale_after_days": state.config.stale_after_days,
            "conversations": counts,
            "stored_messages": stored,
            "aggregation": dashboard.report,
            "database": state.db_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(window.title()).bold());
    println!();

    println!("  {}", style("── Conversations ──").dim());
    println!("  Total:      {}", style(counts.total).bold());
    println!("  Pending:    {}", style(counts.pending).yellow());
    println!("  Incomplete: {}", style(counts.incomplete).red());
    println!("  Complete:   {}", style(counts.complete).green());
    if counts.overridden > 0 {
        println!("  Flagged:    {}", style(counts.overridden).dim());
    }
    println!();

    let report = &dashboard.report;
    println!("  {}", style("── Messages ──").dim());
    println!("  Stored:            {}", stored);
    println!("  Read:              {}", report.input_messages);
    println!("  Sessions hidden:   {}", report.sessions_hidden);
    if report.malformed_messages > 0 {
        println!(
            "  Bad timestamps:    {}",
            style(report.malformed_messages).yellow()
        );
    }
    if report.unattributed_messages > 0 {
        println!(
            "  No session id:     {}",
            style(report.unattributed_messages).yellow()
        );
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(state.db_path.display()).dim());
    println!(
        "  Complete after: {} day(s)",
        state.service.resolver().stale_after().num_days()
    );
    println!();

    Ok(())
}
