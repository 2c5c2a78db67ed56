//! ChatRepository trait definition.
//!
//! Provides persistence for conversations and their messages. Every
//! conversation lookup is scoped by owner so that a user can never reach
//! another user's thread through this interface.

use colloquy_types::chat::{Conversation, Message, NewConversation, NewMessage};
use colloquy_types::error::RepositoryError;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in colloquy-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert a conversation and return it with its assigned id.
    fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id, only if it belongs to `user_id`.
    fn get_conversation(
        &self,
        id: i64,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, most recently created first.
    fn list_conversations(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Delete an owned conversation and, by cascade, its messages.
    ///
    /// Returns `NotFound` if no conversation with this id belongs to `user_id`.
    fn delete_conversation(
        &self,
        id: i64,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Overwrite a conversation's title and lock flag.
    fn update_title(
        &self,
        id: i64,
        title: &str,
        locked: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message and return it with its assigned id.
    fn save_message(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Get all messages of a conversation in `(timestamp, id)` order.
    fn get_messages(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Number of messages stored for a conversation.
    fn count_messages(
        &self,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
