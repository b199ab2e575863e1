//! One-shot history subcommands: view, send and undo.
//!
//! Each command loads the history file, applies one operation and (for
//! mutations) saves it back. Undo/redo state does not survive between
//! invocations, so there is no one-shot redo.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatlog_core::history::{ChatHistory, HistoryView, LoadOutcome};

use crate::state::AppState;

/// Format epoch seconds in local time.
///
/// Falls back to the raw number when the timestamp is out of range or the
/// format string is invalid.
pub fn format_timestamp(created_at: i64, format: &str) -> String {
    let Some(local) = Local.timestamp_opt(created_at, 0).single() else {
        return created_at.to_string();
    };
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return created_at.to_string();
    }
    out
}

/// Build the history table for styled output.
pub fn history_table(view: &HistoryView, timestamp_format: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Message").fg(Color::Cyan),
        ]);

    for entry in view.entries() {
        table.add_row(vec![
            Cell::new(entry.index),
            Cell::new(format_timestamp(entry.created_at, timestamp_format)),
            Cell::new(entry.text.as_str()),
        ]);
    }
    table
}

fn load(state: &AppState) -> Result<ChatHistory> {
    let mut history = ChatHistory::new();
    history
        .load_from(&state.store)
        .with_context(|| format!("Failed to load {}", state.store.path().display()))?;
    Ok(history)
}

/// Load for a command that rewrites the file afterwards.
///
/// Refuses a partial read so the rewrite cannot drop unread records.
fn load_for_update(state: &AppState) -> Result<ChatHistory> {
    let mut history = ChatHistory::new();
    let outcome = history.load_exact_from(&state.store).with_context(|| {
        format!(
            "Refusing to modify {}: it could not be read completely",
            state.store.path().display()
        )
    })?;
    if outcome == LoadOutcome::NoSaveFile {
        tracing::debug!(path = %state.store.path().display(), "starting a new history file");
    }
    Ok(history)
}

fn save(state: &AppState, history: &ChatHistory) -> Result<usize> {
    history
        .save_to(&state.store)
        .with_context(|| format!("Failed to save {}", state.store.path().display()))
}

/// Print the saved history.
pub fn view_history(state: &AppState, json: bool) -> Result<()> {
    let history = load(state)?;
    let view = history.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!();
        println!("  {}", style("No messages.").dim());
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  {} ({})",
        style("Chat History (oldest -> newest)").bold(),
        style(state.store.path().display()).dim()
    );
    println!();
    println!("{}", history_table(&view, &state.config.timestamp_format));
    println!();
    Ok(())
}

/// Append a message to the saved history.
pub fn send_message(state: &AppState, text: &str, json: bool) -> Result<()> {
    let mut history = load_for_update(state)?;
    let receipt = history.send(text);
    let count = save(state, &history)?;

    if json {
        let result = serde_json::json!({
            "status": "sent",
            "truncated": receipt.truncated,
            "count": count,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("  {} Sent.", style("ok").green());
        if receipt.truncated {
            println!(
                "  {} Message truncated to 255 bytes.",
                style("!").yellow().bold()
            );
        }
    }
    Ok(())
}

/// Remove the newest message from the saved history.
pub fn undo_message(state: &AppState, json: bool) -> Result<()> {
    let mut history = load_for_update(state)?;

    match history.undo() {
        Ok(_) => {
            let count = save(state, &history)?;
            if json {
                let result = serde_json::json!({ "status": "undone", "count": count });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("  {} Undo: removed last message.", style("ok").green());
            }
        }
        Err(_) => {
            if json {
                let result = serde_json::json!({ "status": "nothing_to_undo" });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("  {}", style("Nothing to undo.").dim());
            }
        }
    }
    Ok(())
}
