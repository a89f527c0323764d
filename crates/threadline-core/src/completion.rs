//! Completion relay: gateway fragments in, client events out.
//!
//! Sits between the agent gateway and the HTTP layer. Fragments classified
//! as assistant content are forwarded immediately and accumulated; the
//! accumulated reply is handed back in the terminal event so the caller
//! can persist exactly what was streamed.
//!
//! Event order per stream: zero or more `Content`, then exactly one of
//! `Failed` (gateway error, nothing persisted) or `Completed` (carrying
//! the full reply). `Content` events are emitted in the exact order the
//! gateway produced the underlying fragments.

use futures_util::{Stream, StreamExt};

use threadline_types::agent::AgentFragment;
use threadline_types::error::GatewayError;

/// One step of a relayed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    /// An assistant text fragment to forward to the client immediately.
    Content { content: String, chat_id: i64 },
    /// The gateway failed; this event is terminal and no reply follows.
    Failed { error: String },
    /// The fragment sequence ended. `reply` is the in-order concatenation
    /// of every `Content` payload emitted before it (possibly empty).
    Completed { reply: String },
}

/// Relay a gateway fragment stream into client-facing completion events.
///
/// Fragments that are not assistant content (wrong role, absent or empty
/// text) are dropped without an event. A gateway error ends the stream
/// with `Failed`; the fragments seen before it are discarded rather than
/// persisted as a truncated reply.
pub fn relay_fragments<S>(fragments: S, chat_id: i64) -> impl Stream<Item = CompletionEvent>
where
    S: Stream<Item = Result<AgentFragment, GatewayError>>,
{
    async_stream::stream! {
        let mut reply = String::new();
        let mut fragments = std::pin::pin!(fragments);

        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    if let Some(text) = fragment.assistant_text() {
                        reply.push_str(text);
                        yield CompletionEvent::Content {
                            content: text.to_string(),
                            chat_id,
                        };
                    }
                }
                Err(e) => {
                    yield CompletionEvent::Failed {
                        error: e.to_string(),
                    };
                    return;
                }
            }
        }

        yield CompletionEvent::Completed { reply };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use threadline_types::chat::MessageRole;

    fn fragment(role: MessageRole, text: Option<&str>) -> Result<AgentFragment, GatewayError> {
        Ok(AgentFragment {
            role,
            text: text.map(str::to_string),
        })
    }

    async fn collect(
        fragments: Vec<Result<AgentFragment, GatewayError>>,
    ) -> Vec<CompletionEvent> {
        relay_fragments(stream::iter(fragments), 42).collect().await
    }

    #[tokio::test]
    async fn test_reply_equals_concatenation_of_content_events() {
        let events = collect(vec![
            fragment(MessageRole::Assistant, Some("Hel")),
            fragment(MessageRole::Assistant, Some("lo, ")),
            fragment(MessageRole::Assistant, Some("Will!")),
        ])
        .await;

        let mut streamed = String::new();
        for event in &events[..events.len() - 1] {
            match event {
                CompletionEvent::Content { content, chat_id } => {
                    assert_eq!(*chat_id, 42);
                    streamed.push_str(content);
                }
                other => panic!("unexpected event before terminal: {other:?}"),
            }
        }

        assert_eq!(
            events.last(),
            Some(&CompletionEvent::Completed {
                reply: "Hello, Will!".to_string()
            })
        );
        assert_eq!(streamed, "Hello, Will!");
    }

    #[tokio::test]
    async fn test_non_assistant_fragments_are_dropped() {
        let events = collect(vec![
            fragment(MessageRole::User, Some("echo of the question")),
            fragment(MessageRole::System, Some("tool trace")),
            fragment(MessageRole::Assistant, Some("answer")),
            fragment(MessageRole::Assistant, None),
            fragment(MessageRole::Assistant, Some("")),
        ])
        .await;

        assert_eq!(
            events,
            vec![
                CompletionEvent::Content {
                    content: "answer".to_string(),
                    chat_id: 42
                },
                CompletionEvent::Completed {
                    reply: "answer".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_stream_completes_with_empty_reply() {
        let events = collect(vec![]).await;
        assert_eq!(
            events,
            vec![CompletionEvent::Completed {
                reply: String::new()
            }]
        );
    }

    #[tokio::test]
    async fn test_gateway_error_is_terminal_and_discards_reply() {
        let events = collect(vec![
            fragment(MessageRole::Assistant, Some("partial ")),
            Err(GatewayError::Stream("connection reset".to_string())),
            fragment(MessageRole::Assistant, Some("never seen")),
        ])
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            CompletionEvent::Content {
                content: "partial ".to_string(),
                chat_id: 42
            }
        );
        match &events[1] {
            CompletionEvent::Failed { error } => {
                assert!(error.contains("connection reset"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_events_preserve_gateway_order() {
        let parts = ["a", "b", "c", "d", "e"];
        let events = collect(
            parts
                .iter()
                .map(|p| fragment(MessageRole::Assistant, Some(p)))
                .collect(),
        )
        .await;

        let contents: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                CompletionEvent::Content { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(contents, parts);
    }
}
