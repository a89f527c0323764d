//! Chat service orchestrating chat resolution and message persistence.
//!
//! ChatService owns the chat lifecycle rules: explicit creation, implicit
//! creation during a completion request (including the silent fresh-chat
//! fallback for unknown ids), turn persistence, and owner-scoped reads.

use threadline_types::chat::{Chat, ChatMessage, MessageRole};
use threadline_types::error::RepositoryError;
use tracing::{info, warn};

use crate::chat::repository::ChatRepository;
use crate::chat::title::{preview_title, title_from_opening, DEFAULT_TITLE};

/// A chat paired with the title a listing should display.
///
/// Listings override the stored title with a preview of the first user
/// message when one exists.
#[derive(Debug, Clone)]
pub struct ChatOverview {
    pub chat: Chat,
    pub display_title: String,
}

/// Orchestrates chat lifecycle and message persistence.
///
/// Generic over `ChatRepository` so threadline-core never depends on
/// threadline-infra.
pub struct ChatService<C: ChatRepository> {
    repo: C,
}

impl<C: ChatRepository> ChatService<C> {
    /// Create a new chat service over the given repository.
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Create an empty chat with an explicit or defaulted title.
    pub async fn create_chat(
        &self,
        user_id: i64,
        title: Option<String>,
    ) -> Result<Chat, RepositoryError> {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let chat = self.repo.create_chat(user_id, &title).await?;
        info!(chat_id = chat.id, user_id, "chat created");
        Ok(chat)
    }

    /// Resolve the target chat for a completion request.
    ///
    /// - No `chat_id`: create a new chat titled from the opening message,
    ///   or the default title when the request carried no messages.
    /// - `chat_id` present but not matching a chat owned by the caller:
    ///   silently create a fresh chat with the default title instead of
    ///   erroring. Stale ids from client bugs degrade into a new thread
    ///   rather than a failed request.
    /// - Otherwise: the caller's chat.
    pub async fn resolve_completion_chat(
        &self,
        user_id: i64,
        chat_id: Option<i64>,
        opening: Option<&str>,
    ) -> Result<Chat, RepositoryError> {
        match chat_id {
            None => {
                let title = match opening {
                    Some(content) => title_from_opening(content),
                    None => DEFAULT_TITLE.to_string(),
                };
                self.repo.create_chat(user_id, &title).await
            }
            Some(id) => match self.repo.get_chat_owned(id, user_id).await? {
                Some(chat) => Ok(chat),
                None => {
                    warn!(chat_id = id, user_id, "unknown chat id, creating fresh chat");
                    self.repo.create_chat(user_id, DEFAULT_TITLE).await
                }
            },
        }
    }

    /// Persist one turn on a chat.
    pub async fn record_turn(
        &self,
        chat_id: i64,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        self.repo.save_message(chat_id, role, content).await
    }

    /// Persist a completed assistant reply on a chat.
    pub async fn save_assistant_reply(
        &self,
        chat_id: i64,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = self
            .repo
            .save_message(chat_id, MessageRole::Assistant, content)
            .await?;
        info!(chat_id, chars = content.len(), "assistant reply persisted");
        Ok(message)
    }

    /// The caller's most recently created chats, with display titles.
    pub async fn recent_chats(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatOverview>, RepositoryError> {
        let chats = self.repo.list_recent_chats(user_id, limit).await?;

        let mut overviews = Vec::with_capacity(chats.len());
        for chat in chats {
            let display_title = match self.repo.first_message(chat.id).await? {
                Some(first) if first.role == MessageRole::User => preview_title(&first.content),
                _ => chat.title.clone(),
            };
            overviews.push(ChatOverview {
                chat,
                display_title,
            });
        }

        Ok(overviews)
    }

    /// All messages of a chat, visible only to its owner.
    ///
    /// An unknown id and a chat owned by someone else both surface as
    /// [`RepositoryError::NotFound`].
    pub async fn messages_for_owner(
        &self,
        user_id: i64,
        chat_id: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        match self.repo.get_chat_owned(chat_id, user_id).await? {
            Some(chat) => self.repo.get_messages(chat.id).await,
            None => Err(RepositoryError::NotFound),
        }
    }
}
