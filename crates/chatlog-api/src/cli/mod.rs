//! CLI command definitions and dispatch for the `chatlog` binary.
//!
//! Uses clap derive macros for argument parsing. Running without a
//! subcommand starts the interactive menu.

pub mod history;
pub mod menu;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Keep a timestamped message log with undo and redo.
#[derive(Parser)]
#[command(name = "chatlog", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed log output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// History file to save to and load from (overrides config.toml).
    #[arg(long, global = true, env = "CHATLOG_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu: send, view, undo, redo, save, load (default).
    Menu,

    /// Print the saved history, oldest first.
    #[command(alias = "ls")]
    View,

    /// Append one message to the saved history.
    Send {
        /// Message text (longer than 255 bytes is truncated).
        text: String,
    },

    /// Remove the newest message from the saved history.
    Undo,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
