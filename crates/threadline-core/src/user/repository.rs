//! UserRepository trait definition.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in threadline-infra (e.g., `SqliteUserRepository`).

use threadline_types::error::RepositoryError;
use threadline_types::user::{NewUser, User};

/// Repository trait for user account persistence.
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with the assigned id.
    ///
    /// A UNIQUE violation on username or email surfaces as
    /// [`RepositoryError::Conflict`].
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Whether a user with this username already exists.
    fn username_exists(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Whether a user with this email already exists.
    fn email_exists(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
