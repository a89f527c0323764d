//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from threadline-core using sqlx with the
//! split read/write pool. Raw queries, private Row struct, UNIQUE
//! violations mapped to `RepositoryError::Conflict`.

use chrono::{DateTime, Utc};
use sqlx::Row;

use threadline_core::user::repository::UserRepository;
use threadline_types::error::RepositoryError;
use threadline_types::user::{NewUser, User};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db) = e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return RepositoryError::Conflict(db.message().to_string());
        }
    }
    RepositoryError::Query(e.to_string())
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_insert_error)?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let created = repo.create(&new_user("will", "will@example.com")).await.unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_email("will@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "will");
        assert_eq!(found.password_hash, created.password_hash);

        let missing = repo.find_by_email("ghost@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&new_user("will", "will@example.com")).await.unwrap();

        let err = repo
            .create(&new_user("will", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict_and_adds_no_row() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool.clone());
        repo.create(&new_user("will", "will@example.com")).await.unwrap();

        let err = repo
            .create(&new_user("other", "will@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_existence_checks() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&new_user("will", "will@example.com")).await.unwrap();

        assert!(repo.username_exists("will").await.unwrap());
        assert!(!repo.username_exists("ghost").await.unwrap());
        assert!(repo.email_exists("will@example.com").await.unwrap());
        assert!(!repo.email_exists("ghost@example.com").await.unwrap());
    }
}
