//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `colloquy-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads on the reader
//! pool and writes on the single writer connection.

use sqlx::Row;

use colloquy_core::repository::chat::ChatRepository;
use colloquy_types::chat::{Conversation, Message, NewConversation, NewMessage};
use colloquy_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_json};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: i64,
    user_id: i64,
    title: String,
    title_locked: bool,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            title_locked: row.try_get("title_locked")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            title_locked: self.title_locked,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: i64,
    conversation_id: i64,
    content: String,
    is_user: bool,
    timestamp: String,
    metadata: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            content: row.try_get("content")?,
            is_user: row.try_get("is_user")?,
            timestamp: row.try_get("timestamp")?,
            metadata: row.try_get("metadata")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            conversation_id: self.conversation_id,
            content: self.content,
            is_user: self.is_user,
            timestamp: parse_datetime(&self.timestamp)?,
            metadata: parse_json(&self.metadata)?,
        })
    }
}

fn map_conversation_row(row: &sqlx::sqlite::SqliteRow) -> Result<Conversation, RepositoryError> {
    ConversationRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_conversation()
}

fn map_message_row(row: &sqlx::sqlite::SqliteRow) -> Result<Message, RepositoryError> {
    MessageRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_message()
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO conversations (user_id, title, title_locked, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(conversation.user_id)
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_id: conversation.user_id,
            title: conversation.title.clone(),
            title_locked: false,
            created_at: conversation.created_at,
        })
    }

    async fn get_conversation(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_conversation_row).transpose()
    }

    async fn list_conversations(&self, user_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(map_conversation_row).collect()
    }

    async fn delete_conversation(&self, id: i64, user_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn update_title(&self, id: i64, title: &str, locked: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET title = ?, title_locked = ? WHERE id = ?")
            .bind(title)
            .bind(locked)
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_message(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO messages (conversation_id, content, is_user, timestamp, metadata)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.conversation_id)
        .bind(&message.content)
        .bind(message.is_user)
        .bind(format_datetime(&message.timestamp))
        .bind(message.metadata.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id: result.last_insert_rowid(),
            conversation_id: message.conversation_id,
            content: message.content.clone(),
            is_user: message.is_user,
            timestamp: message.timestamp,
            metadata: message.metadata.clone(),
        })
    }

    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(map_message_row).collect()
    }

    async fn count_messages(&self, conversation_id: i64) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM messages WHERE conversation_id = ?")
            .bind(conversation_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u32)
    }
}
