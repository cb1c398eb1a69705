//! Shared HTTP client, line splitting, and auth utilities.

use std::sync::OnceLock;
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use super::LineStream;
use crate::error::RelistaError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| build_client(DEFAULT_TIMEOUT).unwrap_or_default())
}

/// Build a client with a custom request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, RelistaError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Build default headers for a Bearer-token streaming API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> RelistaError {
    match status {
        401 | 403 => RelistaError::Authentication(body.to_string()),
        429 => RelistaError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => RelistaError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

/// Split a byte stream into lines.
///
/// Bytes are buffered until a newline so multi-byte characters split across
/// chunks decode intact. Trailing `\r` is stripped and a final unterminated
/// line is still yielded. The first transport error ends the stream.
pub fn byte_lines<S, B, E>(bytes: S) -> LineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<RelistaError> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();
        let mut failed = false;
        futures::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    yield Err(e.into());
                    failed = true;
                    break;
                }
            };

            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                yield Ok(line_from_bytes(&line));
            }
        }

        if !failed && !buffer.is_empty() {
            yield Ok(line_from_bytes(&buffer));
        }
    })
}

fn line_from_bytes(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
