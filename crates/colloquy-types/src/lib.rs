//! Shared domain types for Colloquy.
//!
//! This crate contains the core domain types used across the Colloquy service:
//! User, Conversation, Message, LLM request/response shapes, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod user;
