//! Transport seam and the OpenAI-compatible chat-completions wire format.

pub mod http;
pub mod openai_compatible;
pub mod sse;

pub use openai_compatible::{build_request_body, OpenAiCompatibleTransport};

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::RelistaError;
use crate::types::{GenerationSettings, Transcript};

/// A lazily read sequence of text lines from the transport.
pub type LineStream = BoxStream<'static, Result<String, RelistaError>>;

/// A request assembled by a session.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub transcript: Transcript,
    /// Tools advertised to the model; `None` on follow-up requests.
    pub tools: Option<Vec<ToolDefinition>>,
    pub settings: GenerationSettings,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Opens streaming completion requests.
///
/// Sessions use the same transport for the initial request and the
/// follow-up request issued after tool execution.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name used in logs (e.g. "mistral").
    fn name(&self) -> &str;

    /// Send `request` and return the response body as lines.
    async fn open(&self, request: &CompletionRequest) -> Result<LineStream, RelistaError>;
}
