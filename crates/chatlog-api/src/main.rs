//! chatlog CLI entry point.
//!
//! Binary name: `chatlog`
//!
//! Parses CLI arguments, initializes logging and configuration, then
//! dispatches to the interactive menu or a one-shot history command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatlog_observe::tracing_setup::{init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default log filter from verbosity; RUST_LOG wins when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,chatlog_core=debug,chatlog_infra=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    // Shell completions don't need app state
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatlog", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.file.as_deref());

    let result = match cli.command {
        None | Some(Commands::Menu) => cli::menu::run_menu(&state),
        Some(Commands::View) => cli::history::view_history(&state, cli.json),
        Some(Commands::Send { text }) => cli::history::send_message(&state, &text, cli.json),
        Some(Commands::Undo) => cli::history::undo_message(&state, cli.json),
        Some(Commands::Completions { .. }) => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
