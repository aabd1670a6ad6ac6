//! Turning assistant thread messages into the text relayed to the ticket.

use std::sync::LazyLock;

use regex::Regex;

use crate::assistant::{MessageRole, ThreadMessage};

/// Relayed when the assistant's answer has no usable text.
pub const REPLY_PLACEHOLDER: &str = "Je n'ai pas pu générer de réponse.";

/// Prepended to the system prompt on every turn.
pub const LANGUAGE_INSTRUCTION: &str = "Always respond in the same language as the user uses.";

static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"【[^【】]*】").unwrap_or_else(|err| panic!("invalid citation regex: {err}"))
});

/// Instruction entry appended before each user message.
pub fn turn_instruction(system_prompt: &str) -> String {
    format!("{LANGUAGE_INSTRUCTION}\n\n{system_prompt}")
}

/// Remove `【…】` file-search citation markers and surrounding whitespace.
pub fn strip_citations(reply: &str) -> String {
    CITATION_REGEX.replace_all(reply, "").trim().to_string()
}

/// Text of the newest assistant message, cleaned; placeholder when missing.
pub fn extract_reply(messages_newest_first: &[ThreadMessage]) -> String {
    let raw = messages_newest_first
        .iter()
        .find(|message| message.role == MessageRole::Assistant)
        .and_then(ThreadMessage::first_text)
        .unwrap_or(REPLY_PLACEHOLDER);
    let cleaned = strip_citations(raw);
    if cleaned.is_empty() {
        REPLY_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

/// Case-insensitive check for a role mention inside a reply.
pub fn mentions(reply: &str, mention: &str) -> bool {
    !mention.is_empty() && reply.to_lowercase().contains(&mention.to_lowercase())
}
