//! UserRepository trait definition.
//!
//! Covers two entity families:
//! - **Users:** account rows keyed by email.
//! - **Tokens:** hashed session tokens issued at login.

use chrono::{DateTime, Utc};
use colloquy_types::error::RepositoryError;
use colloquy_types::user::{NewUser, User};

/// Repository trait for user and session-token persistence.
pub trait UserRepository: Send + Sync {
    /// Insert a user. Returns `Conflict` if the email is already registered.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Exact match on the normalized email.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// All users ordered by email.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Record chat activity for a user.
    fn touch_activity(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    // -----------------------------------------------------------------------
    // Tokens
    // -----------------------------------------------------------------------

    /// Store the hash of a freshly issued token.
    fn save_token(
        &self,
        token_hash: &str,
        user_id: i64,
        created_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token hash to its user, if the token exists.
    fn get_user_by_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Remove a token. Removing an unknown token is not an error.
    fn delete_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
