//! Business logic and repository trait definitions for Colloquy.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `colloquy-types` -- never on
//! `colloquy-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod responder;
pub mod turn;
pub mod user;
