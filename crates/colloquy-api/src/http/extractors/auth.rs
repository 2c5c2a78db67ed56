//! Session authentication extractors.
//!
//! The session token is read from:
//! - `Authorization: Bearer <token>` header
//! - `colloquy_session` cookie
//!
//! Tokens are hashed and resolved through the user service; only active
//! users authenticate.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use colloquy_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "colloquy_session";

/// Authenticated user on a JSON route. Rejects with 401.
pub struct CurrentUser {
    pub user: User,
    /// The plaintext token that authenticated this request.
    pub token: String,
}

/// Authenticated user on a page route. Rejects with a redirect to login.
pub struct PageUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(AppError::Unauthorized)?;
        let user = state
            .user_service
            .resolve_token(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser { user, token })
    }
}

impl FromRequestParts<AppState> for PageUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(current) => Ok(PageUser(current.user)),
            Err(AppError::Unauthorized) => Err(AppError::LoginRequired),
            Err(e) => Err(e),
        }
    }
}

/// Pull the session token from the request, header first.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(auth) = parts.headers.get(AUTHORIZATION) {
        if let Some(token) = auth.to_str().ok().and_then(|s| s.strip_prefix("Bearer ")) {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| cookie_value(header, SESSION_COOKIE))
}

/// Find `name` in a `Cookie` header value.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// `Set-Cookie` value storing `token` for the whole site.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
