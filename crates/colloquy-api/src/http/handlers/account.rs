//! Login, signup and logout.

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse};
use minijinja::context;
use serde::Deserialize;
use serde_json::json;

use crate::http::error::AppError;
use crate::http::extractors::auth::{CurrentUser, clear_session_cookie, session_cookie};
use crate::http::templates;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// GET /accounts/login/
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    templates::render(&state.templates, "login.html", context! { error => () })
}

/// POST /accounts/login/ - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_service
        .authenticate(&form.email, &form.password)
        .await?;
    let token = state.user_service.issue_token(&user).await?;
    state.user_service.touch_activity(user.id).await?;

    Ok((
        [(SET_COOKIE, session_cookie(&token))],
        Json(json!({ "token": token })),
    ))
}

/// POST /accounts/signup/
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_service
        .signup(&form.email, &form.password1, &form.password2)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id, "email": user.email })),
    ))
}

/// POST /accounts/logout/ - Revoke the presented token.
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    state.user_service.revoke_token(&current.token).await?;
    tracing::info!(user_id = current.user.id, "Logged out");
    Ok((
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "status": "success" })),
    ))
}
