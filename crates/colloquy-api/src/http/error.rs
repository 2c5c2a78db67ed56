//! Application error type mapping to HTTP status codes and JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::json;

use colloquy_core::turn::TurnError;
use colloquy_types::chat::ChatError;
use colloquy_types::user::UserError;

/// Where unauthenticated page requests are sent.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Send-message turn failures.
    Turn(TurnError),
    /// Conversation errors outside a turn.
    Chat(ChatError),
    /// Account and login errors.
    User(UserError),
    /// Missing or invalid session on a JSON route.
    Unauthorized,
    /// Missing or invalid session on a page route.
    LoginRequired,
    /// Unknown or foreign conversation on a page route.
    PageNotFound,
    /// Wrong method on the send endpoint.
    InvalidMethod,
    /// Rejected title update, including a wrong method.
    TitleRejected,
    /// Generic internal error.
    Internal(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyTitle => AppError::TitleRejected,
            other => AppError::Chat(other),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

fn turn_response(e: TurnError) -> Response {
    let (status, body) = match e {
        TurnError::MissingConversationId => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Missing conversation_id" }),
        ),
        TurnError::InvalidMessage {
            conversation_id,
            field_errors,
        } => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid form",
                "form_errors": field_errors,
                "conversation_id": conversation_id,
            }),
        ),
        TurnError::NotFound { conversation_id } => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "Conversation not found", "conversation_id": conversation_id }),
        ),
        TurnError::CredentialMissing { conversation_id } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "AI service unavailable. Contact admin.",
                "conversation_id": conversation_id,
            }),
        ),
        TurnError::Responder {
            conversation_id, ..
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "AI service error", "conversation_id": conversation_id }),
        ),
        TurnError::Storage {
            conversation_id, ..
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Internal server error", "conversation_id": conversation_id }),
        ),
    };
    (status, Json(body)).into_response()
}

fn user_response(e: UserError) -> Response {
    let status = match &e {
        UserError::InvalidCredentials | UserError::Inactive => StatusCode::UNAUTHORIZED,
        UserError::NotFound => StatusCode::NOT_FOUND,
        UserError::EmailRequired
        | UserError::InvalidEmail(_)
        | UserError::EmailTaken(_)
        | UserError::SuperuserFlags(_)
        | UserError::PasswordMismatch
        | UserError::EmptyPassword => StatusCode::BAD_REQUEST,
        UserError::Hashing(_) | UserError::Storage(_) => {
            tracing::error!(error = %e, "Account operation failed");
            return internal_error();
        }
    };
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Turn(e) => turn_response(e),
            AppError::Chat(ChatError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Conversation not found" })),
            )
                .into_response(),
            AppError::Chat(e) => {
                tracing::error!(error = %e, "Conversation operation failed");
                internal_error()
            }
            AppError::User(e) => user_response(e),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            AppError::LoginRequired => Redirect::to(LOGIN_PATH).into_response(),
            AppError::PageNotFound => (
                StatusCode::NOT_FOUND,
                Html("<h1>Not Found</h1>".to_string()),
            )
                .into_response(),
            AppError::InvalidMethod => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request method" })),
            )
                .into_response(),
            AppError::TitleRejected => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error" })),
            )
                .into_response(),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        }
    }
}
