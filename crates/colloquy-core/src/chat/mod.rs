//! Conversation and message access for Colloquy.
//!
//! `ChatService` wraps a `ChatRepository` with the ownership, defaulting,
//! and title rules for conversations. `title` holds the pure title helpers.

pub mod service;
pub mod title;

#[cfg(test)]
pub(crate) mod testing;
