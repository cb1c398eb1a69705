//! Higher-level helpers built on streaming sessions.

pub mod collect;
pub mod greeting;
pub mod prompt;
pub mod title;

pub use collect::{collect, ChatResponse};
pub use greeting::{
    format_moment, generate_greeting, greeting_prompt, GreetingSanitizer, GREETING_TEMPERATURE,
};
pub use prompt::{assemble_transcript, system_prompt, EMPTY_CONTENT_PLACEHOLDER};
pub use title::{generate_title, title_transcript, TitleSanitizer, TITLE_INSTRUCTION};
