//! Shared domain types for chatlog.
//!
//! This crate contains the message record, its bounded text, configuration,
//! and the error types shared by the core and infrastructure crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
