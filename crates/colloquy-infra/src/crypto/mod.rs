//! Cryptographic adapters.
//!
//! - `password`: argon2id password hashing (PHC strings)
//! - `token`: random session tokens stored as SHA-256 digests

pub mod password;
pub mod token;
