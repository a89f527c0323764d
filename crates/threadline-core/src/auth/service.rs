//! Auth service orchestrating registration and login.
//!
//! Generic over the user repository, password hasher, and token issuer so
//! each seam can be swapped in tests.

use threadline_types::error::{AuthError, RepositoryError};
use threadline_types::user::{NewUser, User};
use tracing::info;

use crate::auth::hash::PasswordHasher;
use crate::auth::token::{TokenIssuer, TokenPair};
use crate::user::repository::UserRepository;

/// Registration and login over the three auth seams.
pub struct AuthService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> AuthService<U, H, T> {
    /// Create a new auth service.
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Access the token issuer (used by the bearer extractor).
    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Register a new account.
    ///
    /// No token is issued at registration; the client logs in afterwards.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if self.users.username_exists(username).await.map_err(storage)? {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }
        if self.users.email_exists(email).await.map_err(storage)? {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                RepositoryError::Conflict(msg) => AuthError::EmailTaken(msg),
                other => storage(other),
            })?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(storage)?
            .ok_or(AuthError::UnknownEmail)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(&user)?;
        info!(user_id = user.id, "login succeeded");
        Ok((user, pair))
    }
}

fn storage(e: RepositoryError) -> AuthError {
    AuthError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenIdentity;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUserRepository {
        async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let created = User {
                id: users.len() as i64 + 1,
                username: user.username.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                created_at: Utc::now(),
            };
            users.push(created.clone());
            Ok(created)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.username == username))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
        }
    }

    /// Reversible "hash" so tests can assert without real key stretching.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash_password(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    struct StaticIssuer;

    impl TokenIssuer for StaticIssuer {
        fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
            Ok(TokenPair {
                access: format!("access-{}", user.id),
                refresh: format!("refresh-{}", user.id),
            })
        }

        fn verify_access(&self, token: &str) -> Result<TokenIdentity, AuthError> {
            Err(AuthError::InvalidToken(token.to_string()))
        }
    }

    fn service() -> AuthService<MemoryUserRepository, PlainHasher, StaticIssuer> {
        AuthService::new(MemoryUserRepository::default(), PlainHasher, StaticIssuer)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let user = svc
            .register("will", "will@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(user.username, "will");

        let (logged_in, pair) = svc.login("will@example.com", "hunter2").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(pair.access, format!("access-{}", user.id));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let svc = service();
        let err = svc.register("  ", "will@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));

        let err = svc.register("will", "will@example.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let svc = service();
        svc.register("will", "will@example.com", "pw").await.unwrap();

        let err = svc
            .register("will", "other@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let svc = service();
        svc.register("will", "will@example.com", "pw").await.unwrap();

        let err = svc
            .register("other", "will@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let svc = service();
        let err = svc.login("ghost@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownEmail));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let svc = service();
        svc.register("will", "will@example.com", "hunter2").await.unwrap();

        let err = svc.login("will@example.com", "hunter3").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
