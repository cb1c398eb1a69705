//! SSE line decoder for chat-completion streams.
//!
//! Each line maps to zero or more [`ProtocolEvent`]s. Lines that are not
//! `data: ` payloads, do not parse as JSON, or lack the `choices` envelope
//! are skipped: a malformed line never aborts an otherwise healthy stream.

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::trace;

use super::LineStream;
use crate::error::{ProviderErrorDetails, RelistaError};
use crate::types::{FinishReason, MessageAnnotation, ProtocolEvent, ToolCallFragment};

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";
const UNKNOWN: &str = "unknown";
const UNKNOWN_MESSAGE: &str = "Unknown error";

/// A lazily decoded, single-pass event sequence.
pub type EventStream = BoxStream<'static, Result<ProtocolEvent, RelistaError>>;

/// Decode a single line into protocol events.
pub fn decode_line(line: &str) -> Vec<ProtocolEvent> {
    let line = line.trim_end();

    // Out-of-band errors arrive as bare JSON, without the data prefix.
    if line.starts_with('{') && line.contains("\"error\"") {
        return decode_error_line(line).into_iter().collect();
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Vec::new();
    };

    if payload == DONE_SENTINEL {
        return vec![ProtocolEvent::Done];
    }

    let chunk = match serde_json::from_str::<WireChunk>(payload) {
        Ok(chunk) => chunk,
        Err(err) => {
            trace!(error = %err, "skipping unparseable stream line");
            return Vec::new();
        }
    };

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Vec::new();
    };

    let mut events = Vec::new();

    if let Some(delta) = choice.delta {
        if let Some(content) = delta.content {
            events.push(ProtocolEvent::ContentDelta(content));
        }

        for (position, call) in delta.tool_calls.unwrap_or_default().into_iter().enumerate() {
            let function = call.function.unwrap_or_default();
            events.push(ProtocolEvent::ToolCallDelta(ToolCallFragment {
                index: call.index.unwrap_or(position as u32),
                id: call.id.filter(|id| !id.is_empty()),
                name: function.name.filter(|name| !name.is_empty()),
                arguments_chunk: function.arguments.unwrap_or_default(),
            }));
        }

        if let Some(raw) = delta.annotations {
            match serde_json::from_value::<Vec<MessageAnnotation>>(raw) {
                Ok(annotations) => events.push(ProtocolEvent::AnnotationDelta(annotations)),
                Err(err) => trace!(error = %err, "skipping malformed annotations"),
            }
        }
    }

    if let Some(reason) = choice.finish_reason {
        events.push(ProtocolEvent::FinishReason(FinishReason::parse(&reason)));
    }

    events
}

fn decode_error_line(line: &str) -> Option<ProtocolEvent> {
    let json: serde_json::Value = serde_json::from_str(line).ok()?;
    let error = json.get("error")?.as_object()?;

    let field = |name: &str, fallback: &str| match error.get(name) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => fallback.to_string(),
    };

    Some(ProtocolEvent::ErrorPayload(ProviderErrorDetails {
        message: field("message", UNKNOWN_MESSAGE),
        kind: field("type", UNKNOWN),
        code: field("code", UNKNOWN),
    }))
}

/// Turn a line stream into a protocol event stream.
///
/// The stream ends right after [`ProtocolEvent::Done`] and drops the line
/// source, or after the first transport error.
pub fn decode_events(lines: LineStream) -> EventStream {
    Box::pin(async_stream::stream! {
        let mut lines = lines;
        'lines: while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    yield Err(err);
                    break;
                }
            };

            for event in decode_line(&line) {
                let done = event == ProtocolEvent::Done;
                yield Ok(event);
                if done {
                    break 'lines;
                }
            }
        }
    })
}

// Wire types (internal)

#[derive(Deserialize)]
struct WireChunk {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    #[serde(default)]
    delta: Option<WireDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default)]
    annotations: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireToolCall {
    #[serde(default)]
    index: Option<u32>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<WireFunction>,
}

#[derive(Deserialize, Default)]
struct WireFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}
