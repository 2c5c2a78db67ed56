//! Conversation and message types for Colloquy.
//!
//! A conversation is a titled thread owned by one user. Messages belong to a
//! conversation, are tagged as human or assistant, and are immutable once
//! stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title given to conversations created without one.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum stored title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Length of the title derived from the first user message of a turn.
pub const AUTO_TITLE_LEN: usize = 30;

/// Length of the fallback display title for conversations with a blank title.
pub const DISPLAY_TITLE_LEN: usize = 50;

/// A chat thread owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// Set once the owner renames the conversation; auto-titling never
    /// overwrites a locked title.
    pub title_locked: bool,
    pub created_at: DateTime<Utc>,
}

/// A conversation that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A single message within a conversation.
///
/// Messages are ordered by `(timestamp, id)` within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub content: String,
    /// `true` for the human side, `false` for the assistant.
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    /// Additional context about the message (model, token usage, latency).
    pub metadata: serde_json::Value,
}

/// A message that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

/// One prior turn as replayed into the responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub is_user: bool,
}

impl From<&Message> for HistoryEntry {
    fn from(msg: &Message) -> Self {
        Self {
            content: msg.content.clone(),
            is_user: msg.is_user,
        }
    }
}

/// Errors related to conversation operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation not found")]
    ConversationNotFound,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("storage error: {0}")]
    Storage(String),
}
