//! chatscope CLI entry point.
//!
//! Binary name: `chatscope`
//!
//! Parses CLI arguments, loads configuration, initializes tracing and the
//! database, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatscope_infra::config::load_config;
use chatscope_infra::filesystem::resolve_data_dir;
use chatscope_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatscope", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;
    let config = load_config(&data_dir).await;

    init_tracing(&config.logging, cli::verbosity_filter(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init(data_dir, config).await?;
    let result = run(&state, cli).await;

    shutdown_tracing();
    result
}

async fn run(state: &AppState, cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::List { query } => {
            cli::conversation::list_conversations(state, query.as_deref(), cli.json).await?;
        }

        Commands::Show { session } => {
            cli::conversation::show_conversation(state, &session, cli.json).await?;
        }

        Commands::Flag { session, status } => {
            cli::flag::flag_conversation(state, &session, &status, cli.json, cli.quiet).await?;
        }

        Commands::Summary => {
            cli::summary::summary(state, cli.json).await?;
        }

        Commands::Export { range, out } => {
            cli::export::export_completed(state, range, out, cli.json, cli.quiet).await?;
        }

        Commands::Import { file } => {
            cli::import::import_messages(state, &file, cli.json, cli.quiet).await?;
        }

        Commands::Subscribers { action } => {
            cli::subscriber::handle_subscriber_command(action, state, cli.json, cli.quiet).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
