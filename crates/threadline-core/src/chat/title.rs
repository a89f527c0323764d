//! Chat titling rules.
//!
//! A chat created implicitly by a completion request is titled from the
//! opening message; listings override stored titles with a short preview
//! of the first user message.

/// Title for chats created without any message content.
pub const DEFAULT_TITLE: &str = "New conversation";

/// Title derived from the opening message of a new chat: the first 50
/// characters with an ellipsis suffix.
pub fn title_from_opening(content: &str) -> String {
    let head: String = content.chars().take(50).collect();
    format!("{head}...")
}

/// Listing preview of a chat's first user message: at most 30 characters,
/// with an ellipsis only when the content was truncated.
pub fn preview_title(content: &str) -> String {
    if content.chars().count() > 30 {
        let head: String = content.chars().take(30).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_opening_truncates_to_fifty() {
        let long = "a".repeat(80);
        let title = title_from_opening(&long);
        assert_eq!(title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_title_from_opening_short_still_gets_ellipsis() {
        assert_eq!(title_from_opening("Hello"), "Hello...");
    }

    #[test]
    fn test_preview_title_short_content_untouched() {
        assert_eq!(preview_title("What is Rust?"), "What is Rust?");
    }

    #[test]
    fn test_preview_title_truncates_past_thirty() {
        let long = "b".repeat(45);
        assert_eq!(preview_title(&long), format!("{}...", "b".repeat(30)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 60 multibyte chars; byte-indexed slicing would panic here.
        let content = "\u{4f60}".repeat(60);
        let title = title_from_opening(&content);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 53);
    }
}
