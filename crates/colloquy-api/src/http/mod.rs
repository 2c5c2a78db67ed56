//! HTTP layer for Colloquy.
//!
//! Page routes render minijinja templates; the chat actions answer with
//! plain JSON bodies consumed by the page script.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod templates;
