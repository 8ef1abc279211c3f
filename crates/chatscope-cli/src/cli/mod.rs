//! CLI command definitions for the `chatscope` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod conversation;
pub mod export;
pub mod flag;
pub mod import;
pub mod subscriber;
pub mod summary;

use std::path::PathBuf;

use chatscope_types::config::DateRange;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Review chat conversations and track their status.
#[derive(Parser)]
#[command(name = "chatscope", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List conversations, newest first.
    #[command(alias = "ls")]
    List {
        /// Keep only conversations matching this text (id, session, role or content).
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one conversation's transcript.
    Show {
        /// Session id, or the display id shown by `list` (e.g. 003).
        session: String,
    },

    /// Set the status of a conversation.
    Flag {
        /// Session id.
        session: String,

        /// One of: pending, incomplete, complete.
        status: String,
    },

    /// Conversation counts per status.
    Summary,

    /// Export completed conversations as JSON transcripts.
    Export {
        /// Reporting window used for the title and file name
        /// (last-7-days, last-30-days, last-90-days, last-year).
        #[arg(short, long)]
        range: Option<DateRange>,

        /// Output path (defaults to `{data_dir}/exports/<file name>`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Append chat messages from a JSON file to the message store.
    Import {
        /// JSON array of `{session_id, role, content, timestamp}` objects.
        file: PathBuf,
    },

    /// Manage the email notification list (list, add, toggle, export).
    Subscribers {
        #[command(subcommand)]
        action: subscriber::SubscriberCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Log filter implied by the verbosity flags, if any.
pub fn verbosity_filter(verbose: u8, quiet: bool) -> Option<&'static str> {
    match verbose {
        0 if quiet => Some("error"),
        0 => None,
        1 => Some("info,chatscope_core=debug,chatscope_infra=debug"),
        _ => Some("trace"),
    }
}
