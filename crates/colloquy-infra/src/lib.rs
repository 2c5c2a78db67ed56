//! Infrastructure layer for Colloquy.
//!
//! Contains implementations of the traits defined in `colloquy-core`:
//! SQLite storage, the OpenAI-compatible LLM provider, and credential
//! hashing (argon2id passwords, SHA-256 session tokens).

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
