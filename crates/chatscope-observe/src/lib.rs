//! Observability setup for chatscope: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
