//! In-memory user repository and trivial credential adapters for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use colloquy_types::error::RepositoryError;
use colloquy_types::user::{NewUser, User, UserError};

use super::credentials::{PasswordHasher, TokenGenerator};
use crate::repository::user::UserRepository;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tokens: Vec<(String, i64)>,
}

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    tables: Mutex<Tables>,
}

impl InMemoryUserRepository {
    pub(crate) fn token_count(&self) -> usize {
        self.tables.lock().unwrap().tokens.len()
    }

    pub(crate) fn deactivate(&self, user_id: i64) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.is_active = false;
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(user.email.clone()));
        }
        let now = Utc::now();
        let created = User {
            id: tables.users.len() as i64 + 1,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            preferences: serde_json::json!({}),
            last_activity: now,
            date_joined: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let mut users = tables.users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn touch_activity(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        user.last_activity = at;
        Ok(())
    }

    async fn save_token(
        &self,
        token_hash: &str,
        user_id: i64,
        _created_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        tables.tokens.push((token_hash.to_string(), user_id));
        Ok(())
    }

    async fn get_user_by_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let Some((_, user_id)) = tables.tokens.iter().find(|(h, _)| h == token_hash) else {
            return Ok(None);
        };
        Ok(tables.users.iter().find(|u| u.id == *user_id).cloned())
    }

    async fn delete_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        tables.tokens.retain(|(h, _)| h != token_hash);
        Ok(())
    }
}

/// Reversible "hash" that keeps assertions readable.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        stored_hash.strip_prefix("plain$") == Some(password)
    }
}

#[derive(Default)]
pub(crate) struct CountingTokens {
    next: AtomicU64,
}

impl TokenGenerator for CountingTokens {
    fn generate_token(&self) -> String {
        format!("tok-{}", self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn hash_token(&self, token: &str) -> String {
        format!("h:{token}")
    }
}
