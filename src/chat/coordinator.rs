//! Tool execution and transcript splicing for one tool round trip.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::json;

use super::events::{SessionEventEmitter, SessionEventPayload};
use crate::error::RelistaError;
use crate::tools::{validate_arguments, CapabilitySet, ToolArguments, ToolExecutionContext};
use crate::types::{Message, ToolCall, Transcript};

/// Result of answering one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub call_id: String,
    pub tool_name: String,
    /// Text spliced into the transcript as the tool message.
    pub content: String,
    pub is_error: bool,
}

impl ToolOutcome {
    fn success(call: &ToolCall, content: String) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content,
            is_error: false,
        }
    }

    fn failure(call: &ToolCall, error: &RelistaError) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            content: json!({ "error": error.to_string() }).to_string(),
            is_error: true,
        }
    }
}

/// Runs accumulated tool calls against a session's capability set.
///
/// Calls execute one at a time in the order the model emitted them. A call
/// that cannot be resolved, parsed, validated or executed is answered with
/// an error result; it never fails the session.
pub struct ToolExecutionCoordinator {
    capabilities: CapabilitySet,
    emitter: Option<Arc<SessionEventEmitter>>,
}

impl ToolExecutionCoordinator {
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            emitter: None,
        }
    }

    pub(crate) fn with_emitter(mut self, emitter: Arc<SessionEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Execute every call sequentially and return one outcome per call.
    pub async fn execute(&self, calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            outcomes.push(self.execute_one(call).await);
        }
        outcomes
    }

    async fn execute_one(&self, call: &ToolCall) -> ToolOutcome {
        let outcome = match self.run(call).await {
            Ok(content) => ToolOutcome::success(call, content),
            Err(err) => {
                tracing::warn!(
                    tool = %call.name,
                    call_id = %call.id,
                    error = %err,
                    "tool call failed"
                );
                ToolOutcome::failure(call, &err)
            }
        };

        self.emit(SessionEventPayload::ToolFinished {
            call_id: call.id.clone(),
            name: call.name.clone(),
            is_error: outcome.is_error,
        });
        outcome
    }

    async fn run(&self, call: &ToolCall) -> Result<String, RelistaError> {
        let tool = self.capabilities.resolve(&call.name)?;

        let args = ToolArguments::parse(&call.arguments).map_err(|err| {
            RelistaError::ToolArgument {
                tool_name: call.name.clone(),
                message: format!("arguments are not valid JSON: {err}"),
            }
        })?;
        validate_arguments(&call.name, args.raw(), &tool.parameters().schema)?;

        self.emit(SessionEventPayload::ToolStarted {
            call_id: call.id.clone(),
            name: call.name.clone(),
            summary: tool.summarize(&args),
        });
        tracing::debug!(tool = %call.name, call_id = %call.id, "executing tool");

        let ctx = ToolExecutionContext {
            tool_call_id: Some(call.id.clone()),
            tool_name: Some(call.name.clone()),
        };
        let result = AssertUnwindSafe(tool.execute(&args, &ctx))
            .catch_unwind()
            .await
            .map_err(|_| RelistaError::tool_execution(&call.name, "tool panicked"))?;
        result.map_err(|err| match err {
            err @ (RelistaError::ToolExecution { .. } | RelistaError::ToolArgument { .. }) => err,
            other => RelistaError::tool_execution(&call.name, other.to_string()),
        })
    }

    fn emit(&self, payload: SessionEventPayload) {
        if let Some(emitter) = &self.emitter {
            emitter.emit(payload);
        }
    }

    /// Derive the follow-up transcript.
    ///
    /// Appends one assistant message carrying `assistant_text` and every call,
    /// then one tool message per outcome. `transcript` itself is untouched.
    pub fn splice(
        transcript: &Transcript,
        assistant_text: &str,
        calls: &[ToolCall],
        outcomes: &[ToolOutcome],
    ) -> Transcript {
        let assistant = Message::assistant_with_tool_calls(assistant_text, calls.to_vec());
        let results = outcomes
            .iter()
            .map(|outcome| Message::tool_result(&outcome.call_id, &outcome.content));
        transcript.extended(std::iter::once(assistant).chain(results))
    }
}
