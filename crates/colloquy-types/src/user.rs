//! User account types.
//!
//! Users are identified by email address rather than a username. Each user
//! carries a free-form JSON preferences map and the time of their last chat
//! activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered user.
///
/// `password_hash` is an argon2 PHC string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    /// User preferences for chatbot interactions.
    pub preferences: serde_json::Value,
    /// Last time the user interacted with the chat page.
    pub last_activity: DateTime<Utc>,
    pub date_joined: DateTime<Utc>,
}

/// Fields needed to insert a user row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

/// Optional flags for user creation. `None` means "use the default for this
/// kind of user".
#[derive(Debug, Clone, Default)]
pub struct UserFlags {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

/// Errors related to user accounts and authentication.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("the given email must be set")]
    EmailRequired,

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("a user with email '{0}' already exists")]
    EmailTaken(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("this account is inactive")]
    Inactive,

    #[error("superuser must have {0}=true")]
    SuperuserFlags(String),

    #[error("the two password fields didn't match")]
    PasswordMismatch,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Normalize an email address: trim whitespace and lowercase the domain part.
///
/// The local part is left as-is since some mail servers treat it case-sensitively.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Minimal structural email check: one `@`, non-empty local part, and a
/// dotted domain without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("  Alice@EXAMPLE.Com "), "Alice@example.com");
    }

    #[test]
    fn test_normalize_email_without_at() {
        assert_eq!(normalize_email("nobody"), "nobody");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "a@b.co".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            preferences: serde_json::json!({}),
            last_activity: Utc::now(),
            date_joined: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"email\":\"a@b.co\""));
    }

    #[test]
    fn test_superuser_flags_display() {
        let err = UserError::SuperuserFlags("is_staff".to_string());
        assert_eq!(err.to_string(), "superuser must have is_staff=true");
    }
}
