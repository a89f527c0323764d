//! Wire fragment to [`AgentFragment`] normalization.
//!
//! Agent services emit message-shaped fragments in several equivalent
//! representations, depending on how their internal graph serializes
//! messages. All shape handling lives here, once; downstream code only
//! ever sees the normalized tagged type.
//!
//! Recognized role carriers, in precedence order:
//! - a nested `"message"` object holding one of the flat shapes below
//! - a top-level `"role"` key
//! - a top-level `"type"` key
//!
//! Role values accept the `ai`/`human` aliases used by agent-graph
//! serializations alongside the canonical `assistant`/`user`/`system`.
//! Content may be a plain string or a list of `{type: "text", text}`
//! blocks. Anything unrecognized normalizes to `None` and is dropped.

use serde_json::Value;

use threadline_types::agent::AgentFragment;
use threadline_types::chat::MessageRole;

/// Normalize one wire fragment, or `None` if its shape is unrecognized.
pub fn parse_fragment(value: &Value) -> Option<AgentFragment> {
    let obj = value.as_object()?;

    if let Some(inner) = obj.get("message").and_then(Value::as_object) {
        if let Some(fragment) = parse_flat(inner) {
            return Some(fragment);
        }
    }

    parse_flat(obj)
}

fn parse_flat(obj: &serde_json::Map<String, Value>) -> Option<AgentFragment> {
    let role_tag = obj
        .get("role")
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str)?;
    let role = normalize_role(role_tag)?;
    let text = obj.get("content").and_then(extract_text);

    Some(AgentFragment { role, text })
}

fn normalize_role(tag: &str) -> Option<MessageRole> {
    match tag.to_lowercase().as_str() {
        "assistant" | "ai" => Some(MessageRole::Assistant),
        "user" | "human" => Some(MessageRole::User),
        "system" => Some(MessageRole::System),
        _ => None,
    }
}

fn extract_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let mut text = String::new();
            let mut found = false;
            for block in blocks {
                if block.get("type").and_then(Value::as_str) == Some("text") {
                    if let Some(t) = block.get("text").and_then(Value::as_str) {
                        text.push_str(t);
                        found = true;
                    }
                }
            }
            found.then_some(text)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_role_shape() {
        let fragment = parse_fragment(&json!({"role": "assistant", "content": "Hi"})).unwrap();
        assert_eq!(fragment.role, MessageRole::Assistant);
        assert_eq!(fragment.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_flat_type_shape() {
        let fragment = parse_fragment(&json!({"type": "assistant", "content": "Hi"})).unwrap();
        assert_eq!(fragment.role, MessageRole::Assistant);
    }

    #[test]
    fn test_nested_message_shape() {
        let fragment =
            parse_fragment(&json!({"message": {"role": "ai", "content": "Hi"}})).unwrap();
        assert_eq!(fragment.role, MessageRole::Assistant);
        assert_eq!(fragment.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_graph_role_aliases() {
        let ai = parse_fragment(&json!({"type": "ai", "content": "x"})).unwrap();
        assert_eq!(ai.role, MessageRole::Assistant);

        let human = parse_fragment(&json!({"type": "human", "content": "x"})).unwrap();
        assert_eq!(human.role, MessageRole::User);
    }

    #[test]
    fn test_text_block_list_content() {
        let fragment = parse_fragment(&json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "part one"},
                {"type": "tool_use", "name": "get_weather"},
                {"type": "text", "text": " part two"},
            ]
        }))
        .unwrap();
        assert_eq!(fragment.text.as_deref(), Some("part one part two"));
    }

    #[test]
    fn test_content_absent_yields_no_text() {
        let fragment = parse_fragment(&json!({"role": "assistant"})).unwrap();
        assert_eq!(fragment.text, None);
        assert_eq!(fragment.assistant_text(), None);
    }

    #[test]
    fn test_tool_only_block_list_yields_no_text() {
        let fragment = parse_fragment(&json!({
            "role": "assistant",
            "content": [{"type": "tool_use", "name": "get_time"}]
        }))
        .unwrap();
        assert_eq!(fragment.text, None);
    }

    #[test]
    fn test_unrecognized_shapes_are_none() {
        assert!(parse_fragment(&json!({"content": "no role tag"})).is_none());
        assert!(parse_fragment(&json!({"role": "moderator", "content": "x"})).is_none());
        assert!(parse_fragment(&json!("bare string")).is_none());
        assert!(parse_fragment(&json!(42)).is_none());
    }

    #[test]
    fn test_unparseable_nested_message_falls_back_to_flat() {
        let fragment = parse_fragment(&json!({
            "message": {"payload": "opaque"},
            "role": "assistant",
            "content": "fallback"
        }))
        .unwrap();
        assert_eq!(fragment.text.as_deref(), Some("fallback"));
    }
}
