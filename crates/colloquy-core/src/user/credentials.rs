//! Credential traits for password hashing and session tokens.
//!
//! Defined in colloquy-core so services can hash without coupling to a
//! specific algorithm. The argon2 and sha256 adapters live in colloquy-infra.

use colloquy_types::user::UserError;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    fn hash_password(&self, password: &str) -> Result<String, UserError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash never verifies.
    fn verify_password(&self, password: &str, stored_hash: &str) -> bool;
}

/// Opaque session-token generation.
///
/// Only `hash_token(token)` is ever stored; the plaintext token is handed to
/// the client once.
pub trait TokenGenerator: Send + Sync {
    fn generate_token(&self) -> String;

    fn hash_token(&self, token: &str) -> String;
}
