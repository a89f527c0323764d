//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from threadline-core using sqlx with the
//! split read/write pool. Follows the same patterns as
//! `SqliteUserRepository`: raw queries, private Row structs, writer-pool
//! mutations, reader-pool lookups.

use chrono::{DateTime, Utc};
use sqlx::Row;

use threadline_core::chat::repository::ChatRepository;
use threadline_types::chat::{Chat, ChatMessage, MessageRole};
use threadline_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Chat.
struct ChatRow {
    id: i64,
    user_id: i64,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        Ok(Chat {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct MessageRow {
    id: i64,
    chat_id: i64,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id: self.id,
            chat_id: self.chat_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_chat(&self, user_id: i64, title: &str) -> Result<Chat, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO chats (user_id, title, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(Chat {
            id: result.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_chat_owned(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let chat_row = ChatRow::from_row(&row).map_err(query_err)?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn list_recent_chats(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Chat>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chats WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut chats = Vec::with_capacity(rows.len());
        for row in &rows {
            let chat_row = ChatRow::from_row(row).map_err(query_err)?;
            chats.push(chat_row.into_chat()?);
        }

        Ok(chats)
    }

    async fn save_message(
        &self,
        chat_id: i64,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO messages (chat_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(chat_id)
        .bind(role.to_string())
        .bind(content)
        .bind(now.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        // New messages refresh the chat's updated_at
        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(now.to_rfc3339())
            .bind(chat_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            chat_id,
            role,
            content: content.to_string(),
            created_at: now,
        })
    }

    async fn get_messages(&self, chat_id: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows =
            sqlx::query("SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at ASC, id ASC")
                .bind(chat_id)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row = MessageRow::from_row(row).map_err(query_err)?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn first_message(&self, chat_id: i64) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;

        match row {
            Some(row) => {
                let message_row = MessageRow::from_row(&row).map_err(query_err)?;
                Ok(Some(message_row.into_message()?))
            }
            None => Ok(None),
        }
    }
}
