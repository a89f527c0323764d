//! Chat listing, creation, and message history handlers.
//!
//! Endpoints:
//! - GET  /chats/                    - caller's 10 most recent chats
//! - POST /chats/                    - create an empty chat
//! - GET  /chats/{chat_id}/messages/ - full message history, owner only

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadline_types::chat::MessageRole;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Listings return the most recently created chats, capped here.
const RECENT_CHAT_LIMIT: i64 = 10;

/// One chat in a listing. `created_at` is minute-resolution for display.
#[derive(Debug, Serialize)]
pub struct ChatSummary {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

/// One message in a history response.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub content: String,
    pub role: MessageRole,
    pub created_at: DateTime<Utc>,
}

/// Request body for explicit chat creation.
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    #[serde(default)]
    pub title: Option<String>,
}

fn display_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// GET /chats/ - the caller's most recently created chats.
///
/// Ordered by creation time, not the chat's own updated_at: the listing
/// shows where conversations started, not where they were last touched.
pub async fn list_chats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ChatSummary>>, AppError> {
    let overviews = state
        .chat_service
        .recent_chats(user.id, RECENT_CHAT_LIMIT)
        .await?;

    let summaries = overviews
        .into_iter()
        .map(|overview| ChatSummary {
            id: overview.chat.id,
            title: overview.display_title,
            created_at: display_timestamp(&overview.chat.created_at),
        })
        .collect();

    Ok(Json(summaries))
}

/// POST /chats/ - create an empty chat.
pub async fn create_chat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatSummary>), AppError> {
    let chat = state.chat_service.create_chat(user.id, body.title).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChatSummary {
            id: chat.id,
            title: chat.title,
            created_at: display_timestamp(&chat.created_at),
        }),
    ))
}

/// GET /chats/{chat_id}/messages/ - full history of an owned chat.
///
/// 404 for unknown ids and for chats owned by someone else; the two are
/// indistinguishable to the caller.
pub async fn list_messages(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let messages = state
        .chat_service
        .messages_for_owner(user.id, chat_id)
        .await?;

    let views = messages
        .into_iter()
        .map(|message| MessageView {
            id: message.id,
            content: message.content,
            role: message.role,
            created_at: message.created_at,
        })
        .collect();

    Ok(Json(views))
}
