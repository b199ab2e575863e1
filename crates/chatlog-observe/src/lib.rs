//! Observability setup for chatlog: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
