//! SSE streaming chat completion endpoint.
//!
//! POST /chat/completion/
//!
//! Resolves the target chat, persists the inbound user turn, invokes the
//! agent gateway with the most recent user message, forwards assistant
//! fragments to the client as they arrive, and persists the accumulated
//! reply once the stream ends.
//!
//! Wire protocol: every frame is `data: <json>`, where the payload is one
//! of `{"content": ..., "chat_id": ...}` or `{"error": ...}`, terminated
//! by the literal frame `data: [DONE]`. An error frame is terminal even
//! without `[DONE]`. Failures before the stream opens are plain HTTP
//! errors; a malformed body is a 500 with a JSON detail.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;

use threadline_core::completion::{relay_fragments, CompletionEvent};
use threadline_types::chat::MessageRole;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Request body for the completion endpoint.
#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    /// Conversation turns as the client sees them; only the last element
    /// is persisted and only the last user-role element reaches the agent.
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    /// Existing chat to continue; absent or unknown ids produce a fresh
    /// chat owned by the caller.
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// One client-supplied turn.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

/// POST /chat/completion/ - stream an assistant reply.
pub async fn chat_completion(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<CompletionRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Anything wrong with the body aborts before streaming begins.
    let Json(body) = body.map_err(|e| AppError::Internal(e.to_string()))?;

    // Validate the role of the turn we are about to persist before any
    // write happens, chat creation included.
    let latest_role = body
        .messages
        .last()
        .map(|message| {
            message
                .role
                .parse::<MessageRole>()
                .map_err(AppError::Validation)
        })
        .transpose()?;

    let opening = body.messages.first().map(|message| message.content.as_str());
    let chat = state
        .chat_service
        .resolve_completion_chat(user.id, body.chat_id, opening)
        .await?;

    if let (Some(role), Some(latest)) = (latest_role, body.messages.last()) {
        state
            .chat_service
            .record_turn(chat.id, role, &latest.content)
            .await?;
    }

    // The agent sees only the most recent user-role turn, scanned from
    // the end of the array.
    let utterance = body
        .messages
        .iter()
        .rev()
        .find(|message| matches!(message.role.parse(), Ok(MessageRole::User)))
        .map(|message| message.content.clone());

    let chat_id = chat.id;
    let chat_service = state.chat_service.clone();
    let gateway = state.gateway.clone();

    let sse_stream = async_stream::stream! {
        let Some(utterance) = utterance else {
            let data = json!({ "error": "no user message in request" });
            yield Ok::<_, Infallible>(Event::default().data(data.to_string()));
            return;
        };

        let fragments = gateway.stream_reply(&chat_id.to_string(), &utterance);
        let mut events = std::pin::pin!(relay_fragments(fragments, chat_id));

        while let Some(event) = events.next().await {
            match event {
                CompletionEvent::Content { content, chat_id } => {
                    let data = json!({ "content": content, "chat_id": chat_id });
                    yield Ok(Event::default().data(data.to_string()));
                }
                CompletionEvent::Failed { error } => {
                    tracing::warn!(chat_id, error = %error, "agent stream failed");
                    let data = json!({ "error": error });
                    yield Ok(Event::default().data(data.to_string()));
                    return;
                }
                CompletionEvent::Completed { reply } => {
                    if !reply.is_empty() {
                        if let Err(e) = chat_service.save_assistant_reply(chat_id, &reply).await {
                            tracing::error!(chat_id, error = %e, "failed to persist assistant reply");
                            let data = json!({ "error": e.to_string() });
                            yield Ok(Event::default().data(data.to_string()));
                            return;
                        }
                    }
                    yield Ok(Event::default().data("[DONE]"));
                }
            }
        }
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
