//! Conversation management handlers.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::Redirect;
use serde::Deserialize;
use serde_json::{Value, json};

use colloquy_types::chat::ChatError;

use crate::http::error::AppError;
use crate::http::extractors::auth::{CurrentUser, PageUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TitleForm {
    #[serde(default)]
    pub title: String,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Chat(ChatError::ConversationNotFound))
}

/// GET /new/ - Create a conversation and open it.
pub async fn new_conversation(
    State(state): State<AppState>,
    PageUser(user): PageUser,
) -> Result<Redirect, AppError> {
    let conversation = state.chat_service.create_conversation(user.id, None).await?;
    Ok(Redirect::to(&format!("/conversation/{}/", conversation.id)))
}

/// POST /delete/{id}/ - Delete an owned conversation and its messages.
pub async fn delete_conversation(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    state.chat_service.delete_conversation(id, user.id).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// POST /update-title/{id}/ - Rename an owned conversation.
pub async fn update_title(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<String>,
    form: Result<Form<TitleForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let conversation = state
        .chat_service
        .rename_conversation(id, user.id, &form.title)
        .await?;
    Ok(Json(json!({ "status": "success", "new_title": conversation.title })))
}

/// Any other method on /update-title/{id}/.
pub async fn title_invalid_method(_user: CurrentUser) -> AppError {
    AppError::TitleRejected
}
