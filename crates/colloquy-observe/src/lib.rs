//! Observability setup for Colloquy.
//!
//! Installs the global tracing subscriber and, on request, bridges spans
//! (including the `gen_ai.*` spans around LLM calls) to OpenTelemetry.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
