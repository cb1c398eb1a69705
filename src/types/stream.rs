//! Streaming protocol types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::annotation::MessageAnnotation;
use crate::error::{ErrorCategory, ProviderErrorDetails};

/// A typed event decoded from one SSE line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    ContentDelta(String),
    ToolCallDelta(ToolCallFragment),
    AnnotationDelta(Vec<MessageAnnotation>),
    FinishReason(FinishReason),
    ErrorPayload(ProviderErrorDetails),
    /// The `[DONE]` sentinel; nothing follows it.
    Done,
}

/// One streamed piece of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolCallFragment {
    /// Positional index of the call within the assistant turn.
    pub index: u32,
    /// Call id; providers often send it on the first fragment only.
    pub id: Option<String>,
    /// Function name; usually only on the first fragment.
    pub name: Option<String>,
    pub arguments_chunk: String,
}

impl ToolCallFragment {
    /// Routing key: the call id when present, otherwise the index.
    pub fn key(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.index.to_string(),
        }
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
    /// Any reason string this crate does not know.
    Other,
}

impl FinishReason {
    /// Map a provider reason string, falling back to [`FinishReason::Other`].
    pub fn parse(reason: &str) -> Self {
        reason.parse().unwrap_or(Self::Other)
    }
}

/// An item yielded to the caller of a streaming session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Content(String),
    Annotations(Vec<MessageAnnotation>),
}

impl StreamChunk {
    pub fn as_content(&self) -> Option<&str> {
        match self {
            Self::Content(text) => Some(text),
            Self::Annotations(_) => None,
        }
    }
}

/// Terminal value of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// `graceful` is false when the line source ended without `[DONE]`.
    Success { graceful: bool },
    Failure {
        category: ErrorCategory,
        message: String,
    },
    Canceled,
}

impl StreamOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
