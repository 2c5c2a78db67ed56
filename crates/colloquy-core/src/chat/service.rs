//! Chat service: conversation and message access.
//!
//! ChatService enforces ownership on every conversation lookup, applies the
//! default title on creation, validates renames, and exposes append/list for
//! messages. Individual messages are never updated or deleted here; they go
//! away only when their conversation is deleted.

use chrono::Utc;
use tracing::{debug, info};

use colloquy_types::chat::{
    ChatError, Conversation, DEFAULT_TITLE, HistoryEntry, Message, NewConversation, NewMessage,
};
use colloquy_types::error::RepositoryError;

use crate::chat::title::truncate_title;
use crate::repository::chat::ChatRepository;

/// Orchestrates conversation lifecycle and message persistence.
///
/// Generic over `ChatRepository` to maintain clean architecture
/// (colloquy-core never depends on colloquy-infra).
pub struct ChatService<C: ChatRepository> {
    chat_repo: C,
}

fn storage(e: RepositoryError) -> ChatError {
    ChatError::Storage(e.to_string())
}

impl<C: ChatRepository> ChatService<C> {
    pub fn new(chat_repo: C) -> Self {
        Self { chat_repo }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    // --- Conversations ---

    /// List a user's conversations, most recent first.
    pub async fn list_conversations(&self, owner_id: i64) -> Result<Vec<Conversation>, ChatError> {
        self.chat_repo
            .list_conversations(owner_id)
            .await
            .map_err(storage)
    }

    /// Fetch a conversation the requester owns.
    ///
    /// A conversation owned by someone else is indistinguishable from one
    /// that does not exist.
    pub async fn get_owned(&self, id: i64, owner_id: i64) -> Result<Conversation, ChatError> {
        self.chat_repo
            .get_conversation(id, owner_id)
            .await
            .map_err(storage)?
            .ok_or(ChatError::ConversationNotFound)
    }

    /// Create a conversation. Absent or blank titles become "New Chat".
    pub async fn create_conversation(
        &self,
        owner_id: i64,
        title: Option<String>,
    ) -> Result<Conversation, ChatError> {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .map(|t| truncate_title(&t))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let conversation = self
            .chat_repo
            .create_conversation(&NewConversation {
                user_id: owner_id,
                title,
                created_at: Utc::now(),
            })
            .await
            .map_err(storage)?;

        info!(conversation_id = conversation.id, owner_id, "Conversation created");
        Ok(conversation)
    }

    /// The user's most recent conversation, creating one if they have none.
    pub async fn latest_or_create(&self, owner_id: i64) -> Result<Conversation, ChatError> {
        let conversations = self.list_conversations(owner_id).await?;
        match conversations.into_iter().next() {
            Some(conversation) => Ok(conversation),
            None => self.create_conversation(owner_id, None).await,
        }
    }

    /// Delete an owned conversation together with its messages.
    pub async fn delete_conversation(&self, id: i64, owner_id: i64) -> Result<(), ChatError> {
        match self.chat_repo.delete_conversation(id, owner_id).await {
            Ok(()) => {
                info!(conversation_id = id, owner_id, "Conversation deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ChatError::ConversationNotFound),
            Err(e) => Err(storage(e)),
        }
    }

    /// Rename an owned conversation.
    ///
    /// The title is cut to 200 characters and locked against auto-titling.
    /// Empty input is rejected and the stored title is left untouched.
    pub async fn rename_conversation(
        &self,
        id: i64,
        owner_id: i64,
        raw_title: &str,
    ) -> Result<Conversation, ChatError> {
        let mut conversation = self.get_owned(id, owner_id).await?;

        let title = truncate_title(raw_title);
        if title.is_empty() {
            return Err(ChatError::EmptyTitle);
        }

        self.chat_repo
            .update_title(id, &title, true)
            .await
            .map_err(storage)?;

        conversation.title = title;
        conversation.title_locked = true;
        info!(conversation_id = id, "Conversation renamed");
        Ok(conversation)
    }

    /// Set a title chosen by the service rather than the owner.
    ///
    /// Leaves a locked title alone and reports whether the title changed.
    pub async fn apply_auto_title(
        &self,
        conversation: &mut Conversation,
        title: String,
    ) -> Result<bool, ChatError> {
        if conversation.title_locked {
            debug!(conversation_id = conversation.id, "Title locked; skipping auto-title");
            return Ok(false);
        }

        self.chat_repo
            .update_title(conversation.id, &title, false)
            .await
            .map_err(storage)?;
        conversation.title = title;
        Ok(true)
    }

    // --- Messages ---

    /// Append a message to a conversation.
    pub async fn append_message(
        &self,
        conversation_id: i64,
        content: String,
        is_user: bool,
        metadata: serde_json::Value,
    ) -> Result<Message, ChatError> {
        let message = NewMessage {
            conversation_id,
            content,
            is_user,
            timestamp: Utc::now(),
            metadata,
        };
        self.chat_repo.save_message(&message).await.map_err(storage)
    }

    /// All messages of a conversation in timestamp order.
    pub async fn list_messages(&self, conversation_id: i64) -> Result<Vec<Message>, ChatError> {
        self.chat_repo
            .get_messages(conversation_id)
            .await
            .map_err(storage)
    }

    /// Prior turns as `{content, is_user}` pairs, oldest first.
    pub async fn history(&self, conversation_id: i64) -> Result<Vec<HistoryEntry>, ChatError> {
        let messages = self.list_messages(conversation_id).await?;
        Ok(messages.iter().map(HistoryEntry::from).collect())
    }

    pub async fn count_messages(&self, conversation_id: i64) -> Result<u32, ChatError> {
        self.chat_repo
            .count_messages(conversation_id)
            .await
            .map_err(storage)
    }
}
