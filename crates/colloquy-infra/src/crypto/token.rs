//! Session token generation and hashing.
//!
//! Tokens are `clq_` followed by 32 random bytes in hex. Only the SHA-256
//! digest of a token is persisted.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use colloquy_core::user::credentials::TokenGenerator;

const TOKEN_PREFIX: &str = "clq_";

#[derive(Debug, Default)]
pub struct Sha256TokenGenerator;

impl Sha256TokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for Sha256TokenGenerator {
    fn generate_token(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{TOKEN_PREFIX}{hex}")
    }

    fn hash_token(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
