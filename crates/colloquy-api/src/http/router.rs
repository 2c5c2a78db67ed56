//! Axum router configuration with middleware.
//!
//! Page routes redirect anonymous visitors to the login page; the JSON
//! routes answer 401. Middleware: request tracing.

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %Uuid::now_v7(),
        )
    });

    Router::new()
        // Chat pages
        .route("/", get(handlers::chat::home))
        .route("/conversation/{id}/", get(handlers::chat::conversation_detail))
        .route("/new/", get(handlers::conversation::new_conversation))
        // Chat actions
        .route(
            "/send/",
            post(handlers::message::send_message).fallback(handlers::message::invalid_method),
        )
        .route(
            "/delete/{id}/",
            post(handlers::conversation::delete_conversation),
        )
        .route(
            "/update-title/{id}/",
            post(handlers::conversation::update_title)
                .fallback(handlers::conversation::title_invalid_method),
        )
        // Accounts
        .route(
            "/accounts/login/",
            get(handlers::account::login_page).post(handlers::account::login),
        )
        .route("/accounts/signup/", post(handlers::account::signup))
        .route("/accounts/logout/", post(handlers::account::logout))
        // Health check (no auth)
        .route("/health", get(health_check))
        .layer(trace)
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
