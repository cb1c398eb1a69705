//! OpenAI-compatible chat-completions transport (Mistral, OpenRouter, ...).

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::http::{bearer_headers, build_client, byte_lines, shared_client, status_to_error};
use super::{CompletionRequest, LineStream, Transport};
use crate::config::RelistaConfig;
use crate::error::RelistaError;
use crate::types::{Message, Role};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

pub struct OpenAiCompatibleTransport {
    name: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiCompatibleTransport {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            name: "openai-compatible".to_string(),
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: shared_client().clone(),
        }
    }

    /// Build a transport from resolved configuration.
    pub fn from_config(config: &RelistaConfig) -> Result<Self, RelistaError> {
        let api_key = config
            .api_key()
            .ok_or_else(|| RelistaError::Configuration("Missing RELISTA_API_KEY".into()))?;
        let mut transport = Self::new(api_key, Some(config.base_url()));
        transport.client = build_client(config.request_timeout())?;
        transport.name = config.provider_name();
        Ok(transport)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for OpenAiCompatibleTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self, request: &CompletionRequest) -> Result<LineStream, RelistaError> {
        let body = build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            transport = self.name.as_str(),
            model = request.model.as_str(),
            messages = request.transcript.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "opening completion stream"
        );

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        Ok(byte_lines(resp.bytes_stream()))
    }
}

/// Serialize a request into the chat-completions JSON body.
///
/// The `tools` field is only present when tools are advertised.
pub fn build_request_body(request: &CompletionRequest) -> Value {
    let messages = request
        .transcript
        .iter()
        .map(message_to_wire)
        .collect::<Vec<_>>();

    let mut obj = Map::new();
    obj.insert("model".into(), request.model.clone().into());
    obj.insert("messages".into(), messages.into());
    obj.insert("stream".into(), true.into());

    let settings = &request.settings;
    if let Some(max) = settings.max_tokens {
        obj.insert("max_tokens".into(), max.into());
    }
    if let Some(temp) = settings.temperature {
        obj.insert("temperature".into(), temp.into());
    }
    if let Some(top_p) = settings.top_p {
        obj.insert("top_p".into(), top_p.into());
    }
    if let Some(seed) = settings.seed {
        obj.insert("seed".into(), seed.into());
    }
    if let Some(ref user) = settings.user {
        obj.insert("user".into(), user.clone().into());
    }

    if let Some(ref tools) = request.tools {
        if !tools.is_empty() {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            obj.insert("tools".into(), tool_defs.into());
        }
    }

    Value::Object(obj)
}

fn message_to_wire(msg: &Message) -> Value {
    let mut obj = Map::new();
    obj.insert("role".into(), msg.role.as_str().into());

    let calls = msg.tool_calls();
    // Providers distinguish "no textual content" from an empty string.
    if !(msg.role == Role::Assistant && !calls.is_empty() && msg.content.is_empty()) {
        obj.insert("content".into(), msg.content.clone().into());
    }

    if !calls.is_empty() {
        let tc_json: Vec<Value> = calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments,
                    }
                })
            })
            .collect();
        obj.insert("tool_calls".into(), tc_json.into());
    }

    if let Some(ref id) = msg.tool_call_id {
        obj.insert("tool_call_id".into(), id.clone().into());
    }

    Value::Object(obj)
}
