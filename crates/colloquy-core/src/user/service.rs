//! User service: account creation, login and session tokens.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use colloquy_types::error::RepositoryError;
use colloquy_types::user::{
    NewUser, User, UserError, UserFlags, is_valid_email, normalize_email,
};

use super::credentials::{PasswordHasher, TokenGenerator};
use crate::repository::user::UserRepository;

/// Account rules on top of a `UserRepository`.
///
/// Generic over the repository and both credential adapters, so
/// colloquy-core never depends on concrete infra implementations.
pub struct UserService<U: UserRepository, H: PasswordHasher, T: TokenGenerator> {
    user_repo: U,
    hasher: Arc<H>,
    tokens: T,
}

fn storage(e: RepositoryError) -> UserError {
    UserError::Storage(e.to_string())
}

impl<U: UserRepository, H: PasswordHasher + 'static, T: TokenGenerator> UserService<U, H, T> {
    pub fn new(user_repo: U, hasher: H, tokens: T) -> Self {
        Self {
            user_repo,
            hasher: Arc::new(hasher),
            tokens,
        }
    }

    /// Hash on the blocking pool; password hashing is CPU-bound.
    async fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, UserError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))
    }

    pub fn user_repo(&self) -> &U {
        &self.user_repo
    }

    /// Create a regular user. Staff and superuser default to `false`.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        flags: UserFlags,
    ) -> Result<User, UserError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(UserError::EmailRequired);
        }
        if !is_valid_email(&email) {
            return Err(UserError::InvalidEmail(email));
        }
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }

        let new_user = NewUser {
            password_hash: self.hash_password(password).await?,
            is_staff: flags.is_staff.unwrap_or(false),
            is_superuser: flags.is_superuser.unwrap_or(false),
            is_active: flags.is_active.unwrap_or(true),
            email,
        };

        match self.user_repo.create(&new_user).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "User created");
                Ok(user)
            }
            Err(RepositoryError::Conflict(_)) => Err(UserError::EmailTaken(new_user.email)),
            Err(e) => Err(storage(e)),
        }
    }

    /// Create a superuser. Staff and superuser are forced on; asking for
    /// either to be `false` is an error.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &str,
        flags: UserFlags,
    ) -> Result<User, UserError> {
        if flags.is_staff == Some(false) {
            return Err(UserError::SuperuserFlags("is_staff".to_string()));
        }
        if flags.is_superuser == Some(false) {
            return Err(UserError::SuperuserFlags("is_superuser".to_string()));
        }

        let flags = UserFlags {
            is_staff: Some(true),
            is_superuser: Some(true),
            is_active: flags.is_active,
        };
        self.create_user(email, password, flags).await
    }

    /// Self-service registration with password confirmation.
    pub async fn signup(
        &self,
        email: &str,
        password1: &str,
        password2: &str,
    ) -> Result<User, UserError> {
        if password1 != password2 {
            return Err(UserError::PasswordMismatch);
        }
        self.create_user(email, password1, UserFlags::default()).await
    }

    /// Check an email/password pair.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = normalize_email(email);
        let user = self
            .user_repo
            .get_by_email(&email)
            .await
            .map_err(storage)?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash).await? {
            warn!(email = %email, "Failed login attempt");
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_active {
            warn!(user_id = user.id, "Login attempt for inactive account");
            return Err(UserError::Inactive);
        }
        Ok(user)
    }

    /// Issue a fresh session token for `user`. Only its hash is stored.
    pub async fn issue_token(&self, user: &User) -> Result<String, UserError> {
        let token = self.tokens.generate_token();
        let token_hash = self.tokens.hash_token(&token);
        self.user_repo
            .save_token(&token_hash, user.id, Utc::now())
            .await
            .map_err(storage)?;
        info!(user_id = user.id, "Session token issued");
        Ok(token)
    }

    /// Resolve a plaintext token to an active user.
    pub async fn resolve_token(&self, token: &str) -> Result<Option<User>, UserError> {
        let token_hash = self.tokens.hash_token(token);
        let user = self
            .user_repo
            .get_user_by_token(&token_hash)
            .await
            .map_err(storage)?;
        Ok(user.filter(|u| u.is_active))
    }

    pub async fn revoke_token(&self, token: &str) -> Result<(), UserError> {
        let token_hash = self.tokens.hash_token(token);
        self.user_repo
            .delete_token(&token_hash)
            .await
            .map_err(storage)
    }

    /// Stamp `last_activity` with the current time.
    pub async fn touch_activity(&self, user_id: i64) -> Result<(), UserError> {
        match self.user_repo.touch_activity(user_id, Utc::now()).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserError::NotFound),
            Err(e) => Err(storage(e)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.user_repo.list().await.map_err(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::testing::{CountingTokens, InMemoryUserRepository, PlainHasher};

    type TestService = UserService<InMemoryUserRepository, PlainHasher, CountingTokens>;

    fn service() -> TestService {
        UserService::new(
            InMemoryUserRepository::default(),
            PlainHasher,
            CountingTokens::default(),
        )
    }

    #[tokio::test]
    async fn test_create_user_defaults() {
        let svc = service();
        let user = svc
            .create_user("ann@Example.COM", "pw", UserFlags::default())
            .await
            .unwrap();
        assert_eq!(user.email, "ann@example.com");
        assert!(!user.is_staff);
        assert!(!user.is_superuser);
        assert!(user.is_active);
        assert_eq!(user.password_hash, "plain$pw");
    }

    #[tokio::test]
    async fn test_create_user_requires_email() {
        let svc = service();
        let err = svc.create_user("  ", "pw", UserFlags::default()).await.unwrap_err();
        assert!(matches!(err, UserError::EmailRequired));

        let err = svc.create_user("nope", "pw", UserFlags::default()).await.unwrap_err();
        assert!(matches!(err, UserError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let svc = service();
        svc.create_user("ann@example.com", "pw", UserFlags::default())
            .await
            .unwrap();
        let err = svc
            .create_user("ann@EXAMPLE.com", "pw", UserFlags::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken(ref e) if e == "ann@example.com"));
    }

    #[tokio::test]
    async fn test_create_superuser_forces_flags() {
        let svc = service();
        let admin = svc
            .create_superuser("root@example.com", "pw", UserFlags::default())
            .await
            .unwrap();
        assert!(admin.is_staff);
        assert!(admin.is_superuser);
    }

    #[tokio::test]
    async fn test_create_superuser_rejects_false_flags() {
        let svc = service();
        let flags = UserFlags {
            is_staff: Some(false),
            ..UserFlags::default()
        };
        let err = svc
            .create_superuser("root@example.com", "pw", flags)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "superuser must have is_staff=true");

        let flags = UserFlags {
            is_superuser: Some(false),
            ..UserFlags::default()
        };
        let err = svc
            .create_superuser("root@example.com", "pw", flags)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "superuser must have is_superuser=true");
    }

    #[tokio::test]
    async fn test_signup_password_mismatch() {
        let svc = service();
        let err = svc.signup("ann@example.com", "a", "b").await.unwrap_err();
        assert!(matches!(err, UserError::PasswordMismatch));
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let svc = service();
        svc.signup("ann@example.com", "secret", "secret").await.unwrap();

        let user = svc.authenticate("ann@EXAMPLE.com", "secret").await.unwrap();
        assert_eq!(user.email, "ann@example.com");

        let err = svc.authenticate("ann@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));

        let err = svc.authenticate("bob@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let svc = service();
        let user = svc.signup("ann@example.com", "pw", "pw").await.unwrap();
        svc.user_repo().deactivate(user.id);

        let err = svc.authenticate("ann@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, UserError::Inactive));
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let svc = service();
        let user = svc.signup("ann@example.com", "pw", "pw").await.unwrap();

        let token = svc.issue_token(&user).await.unwrap();
        let resolved = svc.resolve_token(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        svc.revoke_token(&token).await.unwrap();
        assert!(svc.resolve_token(&token).await.unwrap().is_none());
        assert_eq!(svc.user_repo().token_count(), 0);
    }

    #[tokio::test]
    async fn test_token_of_inactive_user_does_not_resolve() {
        let svc = service();
        let user = svc.signup("ann@example.com", "pw", "pw").await.unwrap();
        let token = svc.issue_token(&user).await.unwrap();
        svc.user_repo().deactivate(user.id);
        assert!(svc.resolve_token(&token).await.unwrap().is_none());
    }

    struct BrokenHasher;

    impl PasswordHasher for BrokenHasher {
        fn hash_password(&self, _password: &str) -> Result<String, UserError> {
            Err(UserError::Hashing("out of memory".to_string()))
        }

        fn verify_password(&self, _password: &str, _hash: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_hashing_failure_surfaces_and_stores_nothing() {
        let svc = UserService::new(
            InMemoryUserRepository::default(),
            BrokenHasher,
            CountingTokens::default(),
        );
        let err = svc
            .create_user("ann@example.com", "pw", UserFlags::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Hashing(_)));
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_touch_activity() {
        let svc = service();
        let user = svc.signup("ann@example.com", "pw", "pw").await.unwrap();
        svc.touch_activity(user.id).await.unwrap();
        let reloaded = svc.user_repo().get_by_id(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_activity >= user.last_activity);

        assert!(matches!(
            svc.touch_activity(99).await,
            Err(UserError::NotFound)
        ));
    }
}
