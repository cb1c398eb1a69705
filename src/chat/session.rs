//! Streaming chat sessions with one tool round trip.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::accumulator::ToolCallAccumulator;
use super::annotations::AnnotationCollector;
use super::coordinator::ToolExecutionCoordinator;
use super::events::{SessionEventEmitter, SessionEventPayload, SessionEventSink, SessionId};
use crate::error::RelistaError;
use crate::provider::sse::decode_events;
use crate::provider::{CompletionRequest, ToolDefinition, Transport};
use crate::tools::CapabilitySet;
use crate::types::{
    FinishReason, GenerationSettings, ProtocolEvent, StreamChunk, StreamOutcome, ToolCall,
    Transcript,
};

type SessionItem = Result<StreamChunk, RelistaError>;

/// Starts streaming chat sessions against a transport.
///
/// Each call to [`StreamSession::start`] spawns one task that reads the
/// response, executes tool calls if the model asks for them, and streams the
/// follow-up answer into the same output. Requires a Tokio runtime.
#[derive(Clone)]
pub struct StreamSession {
    transport: Arc<dyn Transport>,
    settings: GenerationSettings,
    event_sink: Option<SessionEventSink>,
}

impl StreamSession {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            settings: GenerationSettings::default(),
            event_sink: None,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, sink: SessionEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Start a session.
    ///
    /// Content and citations arrive on the returned stream in server order.
    /// The stream ends after the last item, or yields exactly one error and
    /// then ends. Cancelling stops the stream immediately; tool side effects
    /// that already ran are not rolled back.
    pub fn start(
        &self,
        transcript: Transcript,
        capabilities: CapabilitySet,
        model: impl Into<String>,
    ) -> (SessionStream, CancelHandle) {
        let session_id = Uuid::new_v4();
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(1);
        let emitter = Arc::new(SessionEventEmitter::new(session_id, self.event_sink.clone()));

        let producer = Producer {
            session_id,
            transport: self.transport.clone(),
            settings: self.settings.clone(),
            model: model.into(),
            coordinator: ToolExecutionCoordinator::new(capabilities).with_emitter(emitter.clone()),
            emitter,
            tx,
            token: token.clone(),
        };
        tokio::spawn(producer.run(transcript));

        let stream = SessionStream {
            session_id,
            inner: ReceiverStream::new(rx),
            token: token.clone(),
            finished: false,
        };
        (stream, CancelHandle { token })
    }
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("transport", &self.transport.name())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Cancels a running session. Cloning shares the same session.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Stop the session. Calling it again has no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Caller side of a session.
///
/// Yields nothing once the session is cancelled; dropping the stream
/// cancels the session.
#[derive(Debug)]
pub struct SessionStream {
    session_id: SessionId,
    inner: ReceiverStream<SessionItem>,
    token: CancellationToken,
    finished: bool,
}

impl SessionStream {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

impl Stream for SessionStream {
    type Item = SessionItem;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<SessionItem>> {
        let this = self.get_mut();
        if this.finished || this.token.is_cancelled() {
            this.finished = true;
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Err(err))) => {
                this.finished = true;
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Why the producer stopped early.
enum Halt {
    Canceled,
    Failed(RelistaError),
}

impl From<RelistaError> for Halt {
    fn from(err: RelistaError) -> Self {
        Self::Failed(err)
    }
}

/// How one response ended.
enum RoundEnd {
    ToolCalls { text: String, calls: Vec<ToolCall> },
    Finished { graceful: bool },
}

struct Producer {
    session_id: SessionId,
    transport: Arc<dyn Transport>,
    settings: GenerationSettings,
    model: String,
    coordinator: ToolExecutionCoordinator,
    emitter: Arc<SessionEventEmitter>,
    tx: mpsc::Sender<SessionItem>,
    token: CancellationToken,
}

impl Producer {
    async fn run(self, transcript: Transcript) {
        tracing::debug!(
            session_id = %self.session_id,
            transport = self.transport.name(),
            model = %self.model,
            messages = transcript.len(),
            tools = self.coordinator.capabilities().len(),
            "session start"
        );

        let (outcome, error) = match self.drive(transcript).await {
            Ok(graceful) => (StreamOutcome::Success { graceful }, None),
            Err(Halt::Canceled) => (StreamOutcome::Canceled, None),
            Err(Halt::Failed(err)) => {
                let outcome = StreamOutcome::Failure {
                    category: err.category(),
                    message: err.to_string(),
                };
                (outcome, Some(err))
            }
        };

        tracing::debug!(session_id = %self.session_id, ?outcome, "session finished");
        self.emitter.emit(SessionEventPayload::Finished(outcome));

        // The error is the last item; the channel closes when `self` drops.
        if let Some(err) = error {
            let _ = self.send(Err(err)).await;
        }
    }

    /// Returns whether the final response ended with `[DONE]`.
    async fn drive(&self, transcript: Transcript) -> Result<bool, Halt> {
        let capabilities = self.coordinator.capabilities();
        let tools = (!capabilities.is_empty()).then(|| capabilities.definitions());

        let (text, calls) = match self.round(&transcript, tools, 0).await? {
            RoundEnd::Finished { graceful } => return Ok(graceful),
            RoundEnd::ToolCalls { text, calls } => (text, calls),
        };

        tracing::debug!(
            session_id = %self.session_id,
            calls = calls.len(),
            "executing tool calls"
        );
        let outcomes = self.guard(self.coordinator.execute(&calls)).await?;
        let follow_up = ToolExecutionCoordinator::splice(&transcript, &text, &calls, &outcomes);

        self.emitter.emit(SessionEventPayload::FollowUpRequested);
        match self.round(&follow_up, None, 1).await? {
            RoundEnd::Finished { graceful } => Ok(graceful),
            RoundEnd::ToolCalls { .. } => Err(Halt::Failed(RelistaError::InvalidState(
                "tool calls requested after the follow-up".into(),
            ))),
        }
    }

    /// Stream one response. Only round 0 may stop for tool calls.
    async fn round(
        &self,
        transcript: &Transcript,
        tools: Option<Vec<ToolDefinition>>,
        round: u8,
    ) -> Result<RoundEnd, Halt> {
        let request = CompletionRequest {
            model: self.model.clone(),
            transcript: transcript.clone(),
            tools,
            settings: self.settings.clone(),
        };
        let lines = self.guard(self.transport.open(&request)).await??;
        let mut events = decode_events(lines);

        let mut accumulator = ToolCallAccumulator::new();
        let mut annotations = AnnotationCollector::new();
        let mut text = String::new();

        let graceful = loop {
            let Some(event) = self.guard(events.next()).await? else {
                break false;
            };
            match event? {
                ProtocolEvent::ContentDelta(delta) => {
                    if delta.is_empty() {
                        continue;
                    }
                    text.push_str(&delta);
                    self.send(Ok(StreamChunk::Content(delta))).await?;
                }
                ProtocolEvent::ToolCallDelta(fragment) => accumulator.ingest(fragment),
                ProtocolEvent::AnnotationDelta(citations) => {
                    annotations.ingest(citations);
                    let batch = annotations.drain();
                    if !batch.is_empty() {
                        self.send(Ok(StreamChunk::Annotations(batch))).await?;
                    }
                }
                ProtocolEvent::FinishReason(FinishReason::ToolCalls) => {
                    if round > 0 {
                        tracing::warn!(
                            session_id = %self.session_id,
                            "ignoring tool calls requested by the follow-up response"
                        );
                    } else if !accumulator.is_empty() {
                        return Ok(RoundEnd::ToolCalls {
                            text,
                            calls: accumulator.snapshot(),
                        });
                    }
                }
                ProtocolEvent::FinishReason(reason) => {
                    tracing::trace!(session_id = %self.session_id, round, %reason, "finish reason");
                }
                ProtocolEvent::ErrorPayload(details) => {
                    return Err(Halt::Failed(RelistaError::Provider {
                        message: details.message,
                        kind: details.kind,
                        code: details.code,
                    }));
                }
                ProtocolEvent::Done => break true,
            }
        };

        if !graceful {
            tracing::warn!(
                session_id = %self.session_id,
                round,
                "response ended without [DONE]"
            );
        }
        tracing::debug!(
            session_id = %self.session_id,
            round,
            text_len = text.len(),
            citations = annotations.collected().len(),
            "round complete"
        );
        Ok(RoundEnd::Finished { graceful })
    }

    /// Await `fut` unless the session is cancelled first.
    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Halt> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Halt::Canceled),
            output = fut => Ok(output),
        }
    }

    async fn send(&self, item: SessionItem) -> Result<(), Halt> {
        match self.guard(self.tx.send(item)).await? {
            Ok(()) => Ok(()),
            Err(_) => Err(Halt::Canceled),
        }
    }
}
