//! Chat page handlers.

use axum::extract::{Path, State};
use axum::response::Html;
use serde::Serialize;

use colloquy_core::chat::title::display_title;
use colloquy_types::chat::{ChatError, Conversation, Message};
use colloquy_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::auth::PageUser;
use crate::http::templates;
use crate::state::AppState;

/// Clock time shown next to a message.
pub(crate) fn format_time(message: &Message) -> String {
    message.timestamp.format("%H:%M").to_string()
}

#[derive(Debug, Serialize)]
struct ConversationView {
    id: i64,
    title: String,
}

#[derive(Debug, Serialize)]
struct MessageView {
    id: i64,
    content: String,
    is_user: bool,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct HomePage {
    user_email: String,
    current: ConversationView,
    conversations: Vec<ConversationView>,
    messages: Vec<MessageView>,
}

/// GET / - Chat home with the most recent conversation.
pub async fn home(
    State(state): State<AppState>,
    PageUser(user): PageUser,
) -> Result<Html<String>, AppError> {
    let current = state.chat_service.latest_or_create(user.id).await?;
    state.user_service.touch_activity(user.id).await?;
    render_chat(&state, &user, current).await
}

/// GET /conversation/{id}/ - Chat home scoped to one conversation.
pub async fn conversation_detail(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id: i64 = id.parse().map_err(|_| AppError::PageNotFound)?;
    let current = match state.chat_service.get_owned(id, user.id).await {
        Ok(conversation) => conversation,
        Err(ChatError::ConversationNotFound) => return Err(AppError::PageNotFound),
        Err(e) => return Err(e.into()),
    };
    render_chat(&state, &user, current).await
}

async fn render_chat(
    state: &AppState,
    user: &User,
    current: Conversation,
) -> Result<Html<String>, AppError> {
    let conversations = state.chat_service.list_conversations(user.id).await?;
    let messages = state.chat_service.list_messages(current.id).await?;

    let mut sidebar = Vec::with_capacity(conversations.len());
    for conversation in &conversations {
        sidebar.push(ConversationView {
            id: conversation.id,
            title: view_title(state, conversation).await?,
        });
    }

    let page = HomePage {
        user_email: user.email.clone(),
        current: ConversationView {
            id: current.id,
            title: display_title(&current, messages.first().map(|m| m.content.as_str())),
        },
        conversations: sidebar,
        messages: messages
            .iter()
            .map(|m| MessageView {
                id: m.id,
                content: m.content.clone(),
                is_user: m.is_user,
                timestamp: format_time(m),
            })
            .collect(),
    };

    templates::render(&state.templates, "home.html", page)
}

/// Display title, loading the first message only when the stored title is blank.
async fn view_title(state: &AppState, conversation: &Conversation) -> Result<String, AppError> {
    if !conversation.title.trim().is_empty() {
        return Ok(conversation.title.clone());
    }
    let messages = state.chat_service.list_messages(conversation.id).await?;
    Ok(display_title(
        conversation,
        messages.first().map(|m| m.content.as_str()),
    ))
}
