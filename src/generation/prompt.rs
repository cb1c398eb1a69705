//! Request transcript assembly.

use uuid::Uuid;

use crate::config::RelistaConfig;
use crate::error::RelistaError;
use crate::tools::builtin::{memory_context, MemoryStore};
use crate::types::{Message, Transcript};

/// Stands in for blank message text; the API rejects empty content.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "[No message content]";

/// System prompt for a conversation: agent instructions, falling back to
/// the configured defaults, followed by remembered facts.
pub fn system_prompt(
    config: &RelistaConfig,
    agent_instructions: Option<&str>,
    memory: &dyn MemoryStore,
    agent: Option<Uuid>,
) -> Result<String, RelistaError> {
    let instructions = agent_instructions.unwrap_or_else(|| config.default_instructions());
    Ok(format!("{instructions}{}", memory_context(memory, agent)?))
}

/// Build the transcript sent to the model.
///
/// Existing system messages in `history` are kept after the new one.
/// Blank text is replaced with [`EMPTY_CONTENT_PLACEHOLDER`] except on
/// assistant messages that carry tool calls.
pub fn assemble_transcript(
    system_prompt: &str,
    history: impl IntoIterator<Item = Message>,
) -> Transcript {
    std::iter::once(Message::system(system_prompt))
        .chain(history.into_iter().map(fill_blank))
        .collect()
}

fn fill_blank(mut message: Message) -> Message {
    if message.content.trim().is_empty() && message.tool_calls().is_empty() {
        message.content = EMPTY_CONTENT_PLACEHOLDER.to_string();
    }
    message
}
