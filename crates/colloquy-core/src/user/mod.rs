//! User accounts and session tokens.
//!
//! `UserService` applies the account rules (email normalization, superuser
//! flags, password confirmation) on top of a `UserRepository`. Hashing is
//! delegated to the traits in `credentials`, implemented in colloquy-infra.

pub mod credentials;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
