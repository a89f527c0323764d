//! Normalized agent gateway fragment.
//!
//! The agent service emits message-shaped fragments in several equivalent
//! wire representations. The gateway adapter in threadline-infra collapses
//! all of them into this single tagged type, so everything downstream of
//! the boundary matches on one shape.

use serde::{Deserialize, Serialize};

use crate::chat::MessageRole;

/// One fragment of a streamed agent reply.
///
/// `text` is `None` for fragments that carry no textual payload (tool
/// traffic, bare role markers). Only assistant fragments with non-empty
/// text are forwarded to clients; everything else is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFragment {
    pub role: MessageRole,
    pub text: Option<String>,
}

impl AgentFragment {
    /// Construct an assistant fragment carrying text.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: Some(text.into()),
        }
    }

    /// The assistant-authored text of this fragment, if any.
    ///
    /// Returns `Some` only when the role tag is `assistant` and the text
    /// payload is present and non-empty.
    pub fn assistant_text(&self) -> Option<&str> {
        if self.role != MessageRole::Assistant {
            return None;
        }
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}
