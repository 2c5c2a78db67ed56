//! Send-message endpoint.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use serde::Deserialize;
use serde_json::{Value, json};

use colloquy_types::chat::Message;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::handlers::chat::format_time;
use crate::state::AppState;

/// Form body of `POST /send/`. Both fields are validated by the turn.
#[derive(Debug, Default, Deserialize)]
pub struct SendForm {
    pub conversation_id: Option<String>,
    pub message: Option<String>,
}

fn message_json(message: &Message) -> Value {
    json!({
        "id": message.id,
        "content": message.content,
        "timestamp": format_time(message),
        "is_user": message.is_user,
    })
}

/// POST /send/ - Run one turn and return both new messages.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    form: Result<Form<SendForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    // An unreadable body is an empty form; the turn reports what is missing.
    let form = form.map(|Form(f)| f).unwrap_or_else(|rejection| {
        tracing::warn!(error = %rejection, "Unreadable send form");
        SendForm::default()
    });

    let outcome = state
        .turn_service
        .send(
            user.id,
            form.conversation_id.as_deref(),
            form.message.as_deref(),
            state.responder.as_deref(),
        )
        .await?;

    Ok(Json(json!({
        "user_message": message_json(&outcome.user_message),
        "ai_message": message_json(&outcome.ai_message),
        "conversation_title": outcome.conversation_title,
        "conversation_id": outcome.conversation_id,
    })))
}

/// Any other method on /send/.
pub async fn invalid_method(_user: CurrentUser, method: axum::http::Method) -> AppError {
    tracing::error!(%method, "Invalid request method");
    AppError::InvalidMethod
}
