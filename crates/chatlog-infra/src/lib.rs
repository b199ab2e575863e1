//! Infrastructure layer for chatlog.
//!
//! Contains the implementation of the `HistoryStore` port defined in
//! `chatlog-core` (a fixed-record binary file), data directory resolution,
//! and configuration loading.

pub mod config;
pub mod filesystem;
pub mod storage;
