//! Tests for the SSE line decoder.

use futures::StreamExt;
use pretty_assertions::assert_eq;

use relista::error::{ProviderErrorDetails, RelistaError};
use relista::provider::sse::{decode_events, decode_line};
use relista::provider::LineStream;
use relista::types::{FinishReason, ProtocolEvent, ToolCallFragment};

fn lines(items: Vec<Result<&str, RelistaError>>) -> LineStream {
    let owned: Vec<Result<String, RelistaError>> =
        items.into_iter().map(|item| item.map(str::to_string)).collect();
    Box::pin(futures::stream::iter(owned))
}

async fn decode_all(items: Vec<Result<&str, RelistaError>>) -> Vec<Result<ProtocolEvent, RelistaError>> {
    decode_events(lines(items)).collect().await
}

#[tokio::test]
async fn done_terminates_even_with_trailing_lines() {
    let events = decode_all(vec![
        Ok(r#"data: {"choices":[{"delta":{"content":"a"}}]}"#),
        Ok("data: [DONE]"),
        Ok(r#"data: {"choices":[{"delta":{"content":"b"}}]}"#),
        Err(RelistaError::Stream("never reached".into())),
    ])
    .await;

    let events: Vec<ProtocolEvent> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        events,
        vec![ProtocolEvent::ContentDelta("a".into()), ProtocolEvent::Done]
    );
}

#[tokio::test]
async fn malformed_lines_are_skipped_without_ending_the_stream() {
    let events = decode_all(vec![
        Ok("data: {not json"),
        Ok(": keep-alive"),
        Ok(""),
        Ok("event: message"),
        Ok(r#"data: {"id":"x","object":"chat.completion.chunk"}"#),
        Ok(r#"data: {"choices":[]}"#),
        Ok(r#"data: {"choices":[{"delta":{"content":"ok"}}]}"#),
    ])
    .await;

    let events: Vec<ProtocolEvent> = events.into_iter().map(Result::unwrap).collect();
    assert_eq!(events, vec![ProtocolEvent::ContentDelta("ok".into())]);
}

#[tokio::test]
async fn transport_error_ends_the_stream() {
    let events = decode_all(vec![
        Ok(r#"data: {"choices":[{"delta":{"content":"a"}}]}"#),
        Err(RelistaError::Stream("reset".into())),
        Ok(r#"data: {"choices":[{"delta":{"content":"b"}}]}"#),
    ])
    .await;

    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], Err(RelistaError::Stream(_))));
}

#[test]
fn decodes_a_full_tool_call_chunk() {
    let line = r#"data: {"choices":[{"index":0,"delta":{"content":"","tool_calls":[{"id":"call_1","type":"function","index":0,"function":{"name":"memory","arguments":"{\"action\":"}}]},"finish_reason":"tool_calls"}]}"#;

    assert_eq!(
        decode_line(line),
        vec![
            ProtocolEvent::ContentDelta(String::new()),
            ProtocolEvent::ToolCallDelta(ToolCallFragment {
                index: 0,
                id: Some("call_1".into()),
                name: Some("memory".into()),
                arguments_chunk: "{\"action\":".into(),
            }),
            ProtocolEvent::FinishReason(FinishReason::ToolCalls),
        ]
    );
}

#[test]
fn bare_error_line_uses_unknown_for_missing_fields() {
    assert_eq!(
        decode_line(r#"{"error":{"message":"Rate limit exceeded"}}"#),
        vec![ProtocolEvent::ErrorPayload(ProviderErrorDetails {
            message: "Rate limit exceeded".into(),
            kind: "unknown".into(),
            code: "unknown".into(),
        })]
    );
}

#[test]
fn bare_error_line_without_message_says_unknown_error() {
    assert_eq!(
        decode_line(r#"{"error":{"type":"server_error"}}"#),
        vec![ProtocolEvent::ErrorPayload(ProviderErrorDetails {
            message: "Unknown error".into(),
            kind: "server_error".into(),
            code: "unknown".into(),
        })]
    );
}

#[test]
fn data_prefixed_error_is_not_an_out_of_band_error() {
    assert!(decode_line(r#"data: {"error":{"message":"nope"}}"#).is_empty());
}
