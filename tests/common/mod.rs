//! Shared test helpers and a scripted transport.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;

use relista::chat::{SessionEvent, SessionEventPayload, SessionEventSink, SessionStream};
use relista::error::RelistaError;
use relista::provider::{CompletionRequest, LineStream, Transport};
use relista::types::StreamChunk;

/// One canned response.
pub enum Script {
    /// Lines, then end of body.
    Lines(Vec<String>),
    /// Lines, then the body read never completes.
    Hang(Vec<String>),
    /// Lines, then a transport error.
    FailAfter(Vec<String>, RelistaError),
    /// The request itself fails.
    Reject(RelistaError),
}

/// A transport that replays queued scripts and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn queue_lines(&self, lines: Vec<String>) {
        self.queue(Script::Lines(lines));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn open(&self, request: &CompletionRequest) -> Result<LineStream, RelistaError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RelistaError::InvalidState("no scripted response".into()))?;

        let (lines, tail, hang) = match script {
            Script::Lines(lines) => (lines, None, false),
            Script::Hang(lines) => (lines, None, true),
            Script::FailAfter(lines, err) => (lines, Some(err), false),
            Script::Reject(err) => return Err(err),
        };

        let stream = async_stream::stream! {
            for line in lines {
                yield Ok(line);
            }
            if let Some(err) = tail {
                yield Err(err);
            }
            if hang {
                futures::future::pending::<()>().await;
            }
        };
        Ok(Box::pin(stream))
    }
}

pub fn content(text: &str) -> String {
    format!("data: {}", json!({ "choices": [{ "index": 0, "delta": { "content": text } }] }))
}

pub fn tool_call(index: u32, id: Option<&str>, name: Option<&str>, arguments: &str) -> String {
    let mut call = json!({ "index": index, "function": { "arguments": arguments } });
    if let Some(id) = id {
        call["id"] = json!(id);
        call["type"] = json!("function");
    }
    if let Some(name) = name {
        call["function"]["name"] = json!(name);
    }
    format!("data: {}", json!({ "choices": [{ "index": 0, "delta": { "tool_calls": [call] } }] }))
}

pub fn citation(url: &str, title: &str) -> String {
    let annotation = json!({
        "type": "url_citation",
        "url_citation": { "url": url, "title": title }
    });
    format!("data: {}", json!({ "choices": [{ "index": 0, "delta": { "annotations": [annotation] } }] }))
}

pub fn finish(reason: &str) -> String {
    format!("data: {}", json!({ "choices": [{ "index": 0, "delta": {}, "finish_reason": reason }] }))
}

pub fn done() -> String {
    "data: [DONE]".to_string()
}

/// Drain a session; returns the items before the error and the error, if any.
pub async fn drain(mut stream: SessionStream) -> (Vec<StreamChunk>, Option<RelistaError>) {
    let mut chunks = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => chunks.push(chunk),
            Err(err) => {
                assert!(stream.next().await.is_none(), "items after error");
                return (chunks, Some(err));
            }
        }
    }
    (chunks, None)
}

pub fn texts(chunks: &[StreamChunk]) -> Vec<&str> {
    chunks.iter().filter_map(StreamChunk::as_content).collect()
}

/// Event sink that records payloads.
pub fn recorder() -> (SessionEventSink, Arc<Mutex<Vec<SessionEventPayload>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = events.clone();
    let sink: SessionEventSink = Arc::new(move |event: SessionEvent| {
        seen.lock().unwrap().push(event.payload);
    });
    (sink, events)
}

/// Wait until the recorder has seen a `Finished` event and return it.
pub async fn finished(events: &Mutex<Vec<SessionEventPayload>>) -> SessionEventPayload {
    for _ in 0..200 {
        let found = events
            .lock()
            .unwrap()
            .iter()
            .find(|p| matches!(p, SessionEventPayload::Finished(_)))
            .cloned();
        if let Some(payload) = found {
            return payload;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("session never finished");
}
