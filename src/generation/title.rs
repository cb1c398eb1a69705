//! Conversation title generation.

use regex::Regex;

use super::collect::collect;
use crate::chat::StreamSession;
use crate::error::RelistaError;
use crate::tools::CapabilitySet;
use crate::types::{Message, Role, Transcript};

/// Instruction appended after the conversation when asking for a title.
pub const TITLE_INSTRUCTION: &str = "\
Create a short title (3 words, max 4 words) describing the topic of the FIRST user message and the FIRST assistant reply.
Output the title as plain text only - no quotes, no punctuation marks around it.
Same language as the user.

Incorrect: \"Recipe Ideas\"
Correct: Recipe Ideas";

/// Cleans model output into a single-line title.
#[derive(Debug, Clone)]
pub struct TitleSanitizer {
    markdown: Regex,
    whitespace: Regex,
}

impl TitleSanitizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            markdown: Regex::new(r"[*_`#]+")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let plain = self.markdown.replace_all(raw, "");
        let single_line = self.whitespace.replace_all(plain.trim(), " ");
        single_line
            .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”'))
            .trim()
            .to_string()
    }
}

/// Transcript for the title request: user and assistant turns only, then
/// the title instruction as a user message.
pub fn title_transcript(history: &[Message]) -> Transcript {
    history
        .iter()
        .filter(|m| matches!(m.role, Role::User | Role::Assistant))
        .filter(|m| m.tool_calls().is_empty())
        .map(|m| Message {
            role: m.role,
            content: m.content.clone(),
            tool_call_id: None,
            tool_calls: None,
            timestamp: m.timestamp,
        })
        .chain(std::iter::once(Message::user(TITLE_INSTRUCTION)))
        .collect()
}

/// Ask `model` for a short conversation title. No tools are offered.
pub async fn generate_title(
    session: &StreamSession,
    history: &[Message],
    model: &str,
) -> Result<String, RelistaError> {
    let sanitizer =
        TitleSanitizer::new().map_err(|err| RelistaError::InvalidState(err.to_string()))?;
    let (stream, _cancel) = session.start(title_transcript(history), CapabilitySet::new(), model);
    let response = collect(stream).await?;
    let title = sanitizer.sanitize(&response.text);
    tracing::debug!(model, %title, "generated conversation title");
    Ok(title)
}
