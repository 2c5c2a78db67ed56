//! In-memory `ChatRepository` used by the core unit tests.

use std::sync::Mutex;

use colloquy_types::chat::{Conversation, Message, NewConversation, NewMessage};
use colloquy_types::error::RepositoryError;

use crate::repository::chat::ChatRepository;

#[derive(Default)]
struct Tables {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct InMemoryChatRepository {
    tables: Mutex<Tables>,
}

impl InMemoryChatRepository {
    pub(crate) fn message_count(&self) -> usize {
        self.tables.lock().unwrap().messages.len()
    }

    pub(crate) fn conversation_title(&self, id: i64) -> Option<String> {
        self.tables
            .lock()
            .unwrap()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.title.clone())
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let created = Conversation {
            id: tables.next_id(),
            user_id: conversation.user_id,
            title: conversation.title.clone(),
            title_locked: false,
            created_at: conversation.created_at,
        };
        tables.conversations.push(created.clone());
        Ok(created)
    }

    async fn get_conversation(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn list_conversations(&self, user_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let mut owned: Vec<Conversation> = tables
            .conversations
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(owned)
    }

    async fn delete_conversation(&self, id: i64, user_id: i64) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.conversations.len();
        tables
            .conversations
            .retain(|c| !(c.id == id && c.user_id == user_id));
        if tables.conversations.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.messages.retain(|m| m.conversation_id != id);
        Ok(())
    }

    async fn update_title(&self, id: i64, title: &str, locked: bool) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let conv = tables
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        conv.title = title.to_string();
        conv.title_locked = locked;
        Ok(())
    }

    async fn save_message(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let saved = Message {
            id: tables.next_id(),
            conversation_id: message.conversation_id,
            content: message.content.clone(),
            is_user: message.is_user,
            timestamp: message.timestamp,
            metadata: message.metadata.clone(),
        };
        tables.messages.push(saved.clone());
        Ok(saved)
    }

    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let mut messages: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
        Ok(messages)
    }

    async fn count_messages(&self, conversation_id: i64) -> Result<u32, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count() as u32)
    }
}
