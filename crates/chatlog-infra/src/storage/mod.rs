//! Durable storage for the message log.
//!
//! `record` holds the fixed-size binary codec; `history_file` implements the
//! `HistoryStore` port over a single file.

pub mod history_file;
pub mod record;

pub use history_file::HistoryFile;
