//! Convenience re-exports for common use.

pub use crate::chat::{CancelHandle, SessionEvent, SessionEventPayload, SessionStream, StreamSession};
pub use crate::config::RelistaConfig;
pub use crate::error::{RelistaError, Result};
pub use crate::generation::{collect, ChatResponse};
pub use crate::provider::{OpenAiCompatibleTransport, Transport};
pub use crate::tools::{CapabilitySet, ToolArguments, ToolCapability, ToolParameters, ToolRegistry};
pub use crate::types::{
    GenerationSettings, Message, MessageAnnotation, Role, StreamChunk, StreamOutcome, Transcript,
};
