//! Turn handler: one request cycle producing a user message and an
//! assistant reply.
//!
//! A turn validates its input, checks ownership and the LLM credential
//! before writing anything, then persists the user message, asks the
//! responder, persists the reply and finally auto-titles a conversation
//! whose first turn this was. No step is retried.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use colloquy_types::chat::{ChatError, Message};
use colloquy_types::llm::LlmError;

use crate::chat::service::ChatService;
use crate::chat::title::auto_title;
use crate::repository::chat::ChatRepository;
use crate::responder::ChatResponder;

/// Message shown for a required form field that was absent or blank.
pub const FIELD_REQUIRED: &str = "This field is required.";

/// Why a turn did not complete.
///
/// Every variant past the first carries the conversation id exactly as the
/// client sent it, so it can be echoed back.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("missing conversation_id")]
    MissingConversationId,

    #[error("invalid form: {field_errors:?}")]
    InvalidMessage {
        conversation_id: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("conversation {conversation_id} not found")]
    NotFound { conversation_id: String },

    #[error("LLM credential is not configured")]
    CredentialMissing { conversation_id: String },

    #[error("responder failed: {source}")]
    Responder {
        conversation_id: String,
        #[source]
        source: LlmError,
    },

    #[error("storage error: {message}")]
    Storage {
        conversation_id: String,
        message: String,
    },
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub ai_message: Message,
    pub conversation_title: String,
    pub conversation_id: i64,
}

/// Drives a single send-message turn against a chat service.
pub struct TurnService<C: ChatRepository> {
    chat: Arc<ChatService<C>>,
}

impl<C: ChatRepository> TurnService<C> {
    pub fn new(chat: Arc<ChatService<C>>) -> Self {
        Self { chat }
    }

    /// Run one turn for `owner_id`.
    ///
    /// `responder` is `None` when no LLM credential is configured; the turn
    /// then fails before anything is written.
    pub async fn send(
        &self,
        owner_id: i64,
        conversation_id: Option<&str>,
        message: Option<&str>,
        responder: Option<&ChatResponder>,
    ) -> Result<TurnOutcome, TurnError> {
        let raw_id = match conversation_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                error!("Missing conversation_id in send request");
                return Err(TurnError::MissingConversationId);
            }
        };

        let content = match message.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => {
                let mut field_errors = BTreeMap::new();
                field_errors.insert("message".to_string(), vec![FIELD_REQUIRED.to_string()]);
                error!(conversation_id = %raw_id, errors = ?field_errors, "Send form is not valid");
                return Err(TurnError::InvalidMessage {
                    conversation_id: raw_id,
                    field_errors,
                });
            }
        };

        let Ok(id) = raw_id.parse::<i64>() else {
            error!(conversation_id = %raw_id, "Conversation id is not an integer");
            return Err(TurnError::NotFound {
                conversation_id: raw_id,
            });
        };

        let mut conversation = match self.chat.get_owned(id, owner_id).await {
            Ok(conversation) => conversation,
            Err(ChatError::ConversationNotFound) => {
                error!(conversation_id = id, owner_id, "Conversation not found");
                return Err(TurnError::NotFound {
                    conversation_id: raw_id,
                });
            }
            Err(e) => return Err(storage_failure(raw_id, e)),
        };

        let Some(responder) = responder else {
            error!(conversation_id = id, "LLM API key is not set; refusing turn");
            return Err(TurnError::CredentialMissing {
                conversation_id: raw_id,
            });
        };

        let user_message = self
            .chat
            .append_message(id, content.clone(), true, json!({}))
            .await
            .map_err(|e| storage_failure(raw_id.clone(), e))?;

        let history = self
            .chat
            .history(id)
            .await
            .map_err(|e| storage_failure(raw_id.clone(), e))?;

        let reply = match responder.respond(&content, &history).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(conversation_id = id, error = %e, "AI response error");
                return Err(TurnError::Responder {
                    conversation_id: raw_id,
                    source: e,
                });
            }
        };

        let metadata = json!({
            "model": reply.model,
            "input_tokens": reply.usage.input_tokens,
            "output_tokens": reply.usage.output_tokens,
            "response_ms": reply.response_ms,
        });
        let ai_message = self
            .chat
            .append_message(id, reply.content, false, metadata)
            .await
            .map_err(|e| storage_failure(raw_id.clone(), e))?;

        let count = self
            .chat
            .count_messages(id)
            .await
            .map_err(|e| storage_failure(raw_id.clone(), e))?;
        if count == 2 {
            self.chat
                .apply_auto_title(&mut conversation, auto_title(&content))
                .await
                .map_err(|e| storage_failure(raw_id.clone(), e))?;
        }

        info!(
            conversation_id = id,
            user_message_id = user_message.id,
            ai_message_id = ai_message.id,
            "Turn completed"
        );

        Ok(TurnOutcome {
            user_message,
            ai_message,
            conversation_title: conversation.title,
            conversation_id: id,
        })
    }
}

fn storage_failure(conversation_id: String, e: ChatError) -> TurnError {
    error!(conversation_id = %conversation_id, error = %e, "Turn storage failure");
    TurnError::Storage {
        conversation_id,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::InMemoryChatRepository;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::testing::ScriptedProvider;
    use crate::responder::ResponderSettings;
    use colloquy_types::config::{LlmConfig, PacingConfig};

    fn setup() -> (Arc<ChatService<InMemoryChatRepository>>, TurnService<InMemoryChatRepository>) {
        let chat = Arc::new(ChatService::new(InMemoryChatRepository::default()));
        let turns = TurnService::new(Arc::clone(&chat));
        (chat, turns)
    }

    fn responder(provider: ScriptedProvider) -> ChatResponder {
        let settings = ResponderSettings::from_config(&LlmConfig::default(), &PacingConfig::default());
        ChatResponder::new(BoxLlmProvider::new(provider), settings)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_turn_persists_pair_and_titles() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();
        let responder = responder(ScriptedProvider::replying("Hi there"));

        let outcome = turns
            .send(1, Some(&id), Some("Hello"), Some(&responder))
            .await
            .unwrap();

        assert_eq!(outcome.conversation_title, "Hello");
        assert_eq!(outcome.conversation_id, conv.id);
        assert!(outcome.user_message.is_user);
        assert_eq!(outcome.ai_message.content, "Hi there");
        assert!(!outcome.ai_message.is_user);
        assert_eq!(outcome.ai_message.metadata["output_tokens"], 8);

        let messages = chat.list_messages(conv.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(chat.chat_repo().conversation_title(conv.id).unwrap(), "Hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_first_message_title_truncated() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();
        let responder = responder(ScriptedProvider::replying("Sure"));

        let outcome = turns
            .send(
                1,
                Some(&id),
                Some("How do I configure a reverse proxy for this app?"),
                Some(&responder),
            )
            .await
            .unwrap();
        assert_eq!(outcome.conversation_title, "How do I configure a reverse p...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_turn_keeps_title_and_replays_history() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();
        let provider = ScriptedProvider::replying("Hi there");
        provider.push(Ok("Fine, thanks".to_string()));
        let responder = responder(provider.clone());

        turns
            .send(1, Some(&id), Some("Hello"), Some(&responder))
            .await
            .unwrap();
        let outcome = turns
            .send(1, Some(&id), Some("How are you?"), Some(&responder))
            .await
            .unwrap();

        assert_eq!(outcome.conversation_title, "Hello");
        assert_eq!(chat.count_messages(conv.id).await.unwrap(), 4);

        let requests = provider.requests();
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[2].content, "How are you?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_owned_writes_nothing() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();
        let responder = responder(ScriptedProvider::replying("unused"));

        let err = turns
            .send(2, Some(&id), Some("Hello"), Some(&responder))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::NotFound { ref conversation_id } if *conversation_id == id));
        assert_eq!(chat.chat_repo().message_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_conversation_id() {
        let (_chat, turns) = setup();
        let err = turns.send(1, None, Some("Hello"), None).await.unwrap_err();
        assert!(matches!(err, TurnError::MissingConversationId));

        let err = turns.send(1, Some(""), Some("Hello"), None).await.unwrap_err();
        assert!(matches!(err, TurnError::MissingConversationId));
    }

    #[tokio::test]
    async fn test_blank_message_is_invalid() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();

        let err = turns.send(1, Some(&id), Some("   "), None).await.unwrap_err();
        match err {
            TurnError::InvalidMessage {
                conversation_id,
                field_errors,
            } => {
                assert_eq!(conversation_id, id);
                assert_eq!(field_errors["message"], vec![FIELD_REQUIRED.to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(chat.chat_repo().message_count(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let (_chat, turns) = setup();
        let err = turns.send(1, Some("abc"), Some("Hello"), None).await.unwrap_err();
        assert!(matches!(err, TurnError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_credential_writes_nothing() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();

        let err = turns.send(1, Some(&id), Some("Hello"), None).await.unwrap_err();
        assert!(matches!(err, TurnError::CredentialMissing { .. }));
        assert_eq!(chat.chat_repo().message_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_responder_failure_keeps_only_user_message() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        let id = conv.id.to_string();
        let responder = responder(ScriptedProvider::failing(LlmError::Network(
            "connection reset".to_string(),
        )));

        let err = turns
            .send(1, Some(&id), Some("Hello"), Some(&responder))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Responder { .. }));

        let messages = chat.list_messages(conv.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_user);
        assert_eq!(chat.chat_repo().conversation_title(conv.id).unwrap(), "New Chat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_title_survives_first_turn() {
        let (chat, turns) = setup();
        let conv = chat.create_conversation(1, None).await.unwrap();
        chat.rename_conversation(conv.id, 1, "Trip plans").await.unwrap();
        let id = conv.id.to_string();
        let responder = responder(ScriptedProvider::replying("Sounds fun"));

        let outcome = turns
            .send(1, Some(&id), Some("Going to Lisbon"), Some(&responder))
            .await
            .unwrap();
        assert_eq!(outcome.conversation_title, "Trip plans");
    }
}
