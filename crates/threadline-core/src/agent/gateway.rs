//! AgentGateway trait definition.
//!
//! The gateway is an external black box: given a session key and one user
//! utterance it produces a lazy, finite, non-restartable stream of
//! normalized fragments. The production implementation (an HTTP/SSE
//! client) lives in threadline-infra; tests substitute scripted streams.

use std::pin::Pin;

use futures_util::Stream;

use threadline_types::agent::AgentFragment;
use threadline_types::error::GatewayError;

/// A boxed stream of normalized agent fragments.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = Result<AgentFragment, GatewayError>> + Send + 'static>>;

/// External agent that turns one user utterance into a streamed reply.
///
/// The session key scopes the agent's conversation state and is always an
/// explicit parameter -- the gateway holds no ambient per-conversation
/// state on our side of the boundary. The returned stream is boxed so the
/// gateway can be held as a trait object and swapped in tests.
pub trait AgentGateway: Send + Sync {
    /// Start a streamed reply for `utterance` within the conversation
    /// identified by `session_key`.
    fn stream_reply(&self, session_key: &str, utterance: &str) -> FragmentStream;
}
