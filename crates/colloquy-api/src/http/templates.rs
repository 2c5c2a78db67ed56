//! Server-rendered pages.
//!
//! Templates are compiled into the binary and loaded once into a shared
//! minijinja environment. Names ending in `.html` are auto-escaped.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::http::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("login.html", include_str!("../../templates/login.html")),
];

/// Build the template environment with every page registered.
pub fn build_environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Render `name` with `ctx` into an HTML response.
pub fn render<S: Serialize>(
    env: &Environment<'static>,
    name: &str,
    ctx: S,
) -> Result<Html<String>, AppError> {
    let template = env
        .get_template(name)
        .map_err(|e| AppError::Internal(format!("template {name}: {e}")))?;
    let body = template
        .render(ctx)
        .map_err(|e| AppError::Internal(format!("rendering {name}: {e}")))?;
    Ok(Html(body))
}
