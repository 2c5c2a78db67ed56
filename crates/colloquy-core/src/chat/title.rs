//! Conversation title helpers.
//!
//! All lengths are counted in characters, not bytes, so multibyte text is
//! never split mid-codepoint.

use colloquy_types::chat::{
    AUTO_TITLE_LEN, Conversation, DEFAULT_TITLE, DISPLAY_TITLE_LEN, MAX_TITLE_LEN,
};

/// Title derived from the user message of a conversation's first turn.
///
/// The first 30 characters, with `...` appended only when the message was
/// longer than that.
pub fn auto_title(message: &str) -> String {
    truncate_with_ellipsis(message, AUTO_TITLE_LEN)
}

/// Clamp an owner-supplied title to the stored maximum (200 characters).
pub fn truncate_title(raw: &str) -> String {
    raw.chars().take(MAX_TITLE_LEN).collect()
}

/// Title shown for a conversation.
///
/// The stored title wins when it is non-blank. Otherwise the first 50
/// characters of the first message are used, followed by `...`, and a
/// conversation with no messages shows the default title.
pub fn display_title(conversation: &Conversation, first_message: Option<&str>) -> String {
    if !conversation.title.trim().is_empty() {
        return conversation.title.clone();
    }
    match first_message {
        Some(content) => {
            let head: String = content.chars().take(DISPLAY_TITLE_LEN).collect();
            format!("{head}...")
        }
        None => DEFAULT_TITLE.to_string(),
    }
}

fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
