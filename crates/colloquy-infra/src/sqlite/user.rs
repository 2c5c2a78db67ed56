//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `colloquy-core`: account rows in `users`
//! and hashed session tokens in `auth_tokens`.

use chrono::{DateTime, Utc};
use sqlx::Row;

use colloquy_core::repository::user::UserRepository;
use colloquy_types::error::RepositoryError;
use colloquy_types::user::{NewUser, User};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_json};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    is_staff: bool,
    is_superuser: bool,
    is_active: bool,
    preferences: String,
    last_activity: String,
    date_joined: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_staff: row.try_get("is_staff")?,
            is_superuser: row.try_get("is_superuser")?,
            is_active: row.try_get("is_active")?,
            preferences: row.try_get("preferences")?,
            last_activity: row.try_get("last_activity")?,
            date_joined: row.try_get("date_joined")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            preferences: parse_json(&self.preferences)?,
            last_activity: parse_datetime(&self.last_activity)?,
            date_joined: parse_datetime(&self.date_joined)?,
        })
    }
}

fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    UserRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_user()
}

const USER_COLUMNS: &str = "u.id, u.email, u.password_hash, u.is_staff, u.is_superuser, \
     u.is_active, u.preferences, u.last_activity, u.date_joined";

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        let preferences = serde_json::json!({});

        let result = sqlx::query(
            r#"INSERT INTO users (email, password_hash, is_staff, is_superuser, is_active, preferences, last_activity, date_joined)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.is_active)
        .bind(preferences.to_string())
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("email '{}' already registered", user.email))
            }
            other => RepositoryError::Query(other.to_string()),
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            preferences,
            last_activity: now,
            date_joined: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?"))
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.email"))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(map_user_row).collect()
    }

    async fn touch_activity(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET last_activity = ? WHERE id = ?")
            .bind(format_datetime(&at))
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_token(
        &self,
        token_hash: &str,
        user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(token_hash)
            .bind(user_id)
            .bind(format_datetime(&created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_user_by_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM auth_tokens t JOIN users u ON u.id = t.user_id WHERE t.token_hash = ?"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE auth_tokens SET last_used_at = ? WHERE token_hash = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_user_row(&row).map(Some)
    }

    async fn delete_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
