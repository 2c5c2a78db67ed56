//! LLM provider abstractions for Colloquy.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;
