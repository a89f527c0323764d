//! ChatRepository trait definition.
//!
//! CRUD operations for chats and their messages. Follows the same RPITIT
//! pattern as `UserRepository`; implementations live in threadline-infra.

use threadline_types::chat::{Chat, ChatMessage, MessageRole};
use threadline_types::error::RepositoryError;

/// Repository trait for chat and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a new chat owned by `user_id` and return it with the
    /// assigned id.
    fn create_chat(
        &self,
        user_id: i64,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Look up a chat by id, scoped to its owner.
    ///
    /// Returns `None` both when no such chat exists and when it belongs
    /// to a different user -- callers cannot distinguish the two.
    fn get_chat_owned(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// List a user's chats ordered by created_at DESC, newest first.
    fn list_recent_chats(
        &self,
        user_id: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Chat>, RepositoryError>> + Send;

    /// Append a message to a chat and refresh the chat's updated_at.
    fn save_message(
        &self,
        chat_id: i64,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// All messages of a chat, ordered by created_at ASC.
    fn get_messages(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The oldest message of a chat, if any.
    fn first_message(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;
}
