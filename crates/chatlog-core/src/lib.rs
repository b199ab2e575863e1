//! Ordered message log, undo/redo controller and storage port for chatlog.
//!
//! This crate defines the in-memory data structures and the "port"
//! (`HistoryStore`) that the infrastructure layer implements. It depends only
//! on `chatlog-types` -- never on `chatlog-infra` or any I/O crate.

pub mod arena;
pub mod history;
pub mod log;
pub mod repository;
