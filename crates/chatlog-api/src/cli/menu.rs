//! Interactive menu loop.
//!
//! Presents the seven menu entries (send, view, undo, redo, save, load,
//! exit), gathers input with `dialoguer`, and maps every outcome to a short
//! reply. All state lives in one [`ChatHistory`] for the length of the
//! session; nothing is saved unless the user picks Save (or `save_on_exit`
//! is set).

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};
use tracing::warn;

use chatlog_core::history::{ChatHistory, HistoryView, LoadOutcome};
use chatlog_infra::storage::HistoryFile;

use super::history::format_timestamp;
use crate::state::AppState;

/// Menu entries in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Send,
    View,
    Undo,
    Redo,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::Send,
        MenuChoice::View,
        MenuChoice::Undo,
        MenuChoice::Redo,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Send => "Send Message",
            MenuChoice::View => "View History",
            MenuChoice::Undo => "Undo Last",
            MenuChoice::Redo => "Redo Last",
            MenuChoice::Save => "Save",
            MenuChoice::Load => "Load",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A fully specified menu action (Send carries its text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Send(String),
    View,
    Undo,
    Redo,
    Save,
    Load,
    Exit,
}

/// How a reply should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Notice,
    Failure,
}

/// Result of one menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub tone: Tone,
    pub lines: Vec<String>,
    /// The loop should stop after printing this reply.
    pub exit: bool,
}

impl Reply {
    fn new(tone: Tone, line: impl Into<String>) -> Self {
        Self {
            tone,
            lines: vec![line.into()],
            exit: false,
        }
    }
}

/// State of one interactive session.
pub struct MenuSession {
    pub history: ChatHistory,
    pub store: HistoryFile,
    pub timestamp_format: String,
    pub save_on_exit: bool,
}

impl MenuSession {
    pub fn new(store: HistoryFile, timestamp_format: String, save_on_exit: bool) -> Self {
        Self {
            history: ChatHistory::new(),
            store,
            timestamp_format,
            save_on_exit,
        }
    }

    /// Apply one action and describe the outcome.
    ///
    /// Most actions produce a single reply. Exit with `save_on_exit` set
    /// reports the save separately before the goodbye.
    pub fn apply(&mut self, action: MenuAction) -> Vec<Reply> {
        let reply = match action {
            MenuAction::Send(text) => self.send(&text),
            MenuAction::View => self.view(),
            MenuAction::Undo => match self.history.undo() {
                Ok(_) => Reply::new(Tone::Success, "Undo: removed last message."),
                Err(_) => Reply::new(Tone::Notice, "Nothing to undo."),
            },
            MenuAction::Redo => match self.history.redo() {
                Ok(_) => Reply::new(Tone::Success, "Redo: message restored."),
                Err(_) => Reply::new(Tone::Notice, "Nothing to redo."),
            },
            MenuAction::Save => self.save(),
            MenuAction::Load => self.load(),
            MenuAction::Exit => return self.exit(),
        };
        vec![reply]
    }

    fn send(&mut self, text: &str) -> Reply {
        let receipt = self.history.send(text);
        let mut reply = Reply::new(Tone::Success, "Sent.");
        if receipt.truncated {
            reply.lines.push("Message truncated to 255 bytes.".to_string());
        }
        reply
    }

    fn load(&mut self) -> Reply {
        match self.history.load_from(&self.store) {
            Ok(LoadOutcome::Loaded { .. }) => Reply::new(
                Tone::Success,
                format!("Loaded from {}", self.store.path().display()),
            ),
            Ok(LoadOutcome::NoSaveFile) => Reply::new(Tone::Notice, "No save file."),
            Err(err) => {
                warn!(error = %err, "load failed");
                Reply::new(Tone::Failure, format!("Load failed: {err}"))
            }
        }
    }

    fn exit(&mut self) -> Vec<Reply> {
        let mut replies = Vec::with_capacity(2);
        if self.save_on_exit {
            replies.push(self.save());
        }
        self.history.shutdown();

        let mut goodbye = Reply::new(Tone::Success, "Goodbye!");
        goodbye.exit = true;
        replies.push(goodbye);
        replies
    }

    fn save(&self) -> Reply {
        match self.history.save_to(&self.store) {
            Ok(_) => Reply::new(
                Tone::Success,
                format!("Saved to {}", self.store.path().display()),
            ),
            Err(err) => {
                warn!(error = %err, "save failed");
                Reply::new(Tone::Failure, "Cannot open file.")
            }
        }
    }

    fn view(&self) -> Reply {
        match self.history.view() {
            HistoryView::Empty => Reply::new(Tone::Notice, "No messages."),
            HistoryView::Entries(entries) => {
                let mut lines = Vec::with_capacity(entries.len() + 1);
                lines.push("=== Chat History (oldest -> newest) ===".to_string());
                for entry in entries {
                    lines.push(format!(
                        "{}. [{}] {}",
                        entry.index,
                        format_timestamp(entry.created_at, &self.timestamp_format),
                        entry.text
                    ));
                }
                Reply {
                    tone: Tone::Success,
                    lines,
                    exit: false,
                }
            }
        }
    }
}

fn print_reply(reply: &Reply) {
    for line in &reply.lines {
        match reply.tone {
            Tone::Success => println!("  {line}"),
            Tone::Notice => println!("  {}", style(line).dim()),
            Tone::Failure => println!("  {} {}", style("!").red().bold(), style(line).red()),
        }
    }
}

/// Ask for the next action. Escape or `q` on the menu counts as Exit.
fn prompt_action() -> Result<MenuAction> {
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    let selection = Select::new()
        .with_prompt("Choice")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    let choice = selection
        .and_then(MenuChoice::from_index)
        .unwrap_or(MenuChoice::Exit);

    let action = match choice {
        MenuChoice::Send => {
            let text: String = Input::new()
                .with_prompt("Type message")
                .allow_empty(true)
                .interact_text()?;
            MenuAction::Send(text)
        }
        MenuChoice::View => MenuAction::View,
        MenuChoice::Undo => MenuAction::Undo,
        MenuChoice::Redo => MenuAction::Redo,
        MenuChoice::Save => MenuAction::Save,
        MenuChoice::Load => MenuAction::Load,
        MenuChoice::Exit => MenuAction::Exit,
    };
    Ok(action)
}

/// Run the interactive menu until the user exits.
pub fn run_menu(state: &AppState) -> Result<()> {
    let mut session = MenuSession::new(
        state.store.clone(),
        state.config.timestamp_format.clone(),
        state.config.save_on_exit,
    );

    if state.config.load_on_start {
        for reply in session.apply(MenuAction::Load) {
            print_reply(&reply);
        }
    }

    loop {
        println!();
        println!("  {}", style("=== Chat Message History Manager ===").bold());
        let action = prompt_action()?;
        let replies = session.apply(action);
        for reply in &replies {
            print_reply(reply);
        }
        if replies.iter().any(|reply| reply.exit) {
            break;
        }
    }
    Ok(())
}
