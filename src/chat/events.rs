//! Session event stream types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::StreamOutcome;

/// Callback receiving session events.
pub type SessionEventSink = Arc<dyn Fn(SessionEvent) + Send + Sync>;

/// Identifier of one streaming session.
pub type SessionId = Uuid;

/// Payloads emitted while a session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEventPayload {
    ToolStarted {
        call_id: String,
        name: String,
        /// Short human-readable description from `ToolCapability::summarize`.
        summary: String,
    },
    ToolFinished {
        call_id: String,
        name: String,
        is_error: bool,
    },
    FollowUpRequested,
    Finished(StreamOutcome),
}

/// Envelope for session events.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: SessionEventPayload,
}

pub(crate) struct SessionEventEmitter {
    session_id: SessionId,
    seq: AtomicU64,
    sink: Option<SessionEventSink>,
}

impl SessionEventEmitter {
    pub(crate) fn new(session_id: SessionId, sink: Option<SessionEventSink>) -> Self {
        Self {
            session_id,
            seq: AtomicU64::new(1),
            sink,
        }
    }

    pub(crate) fn emit(&self, payload: SessionEventPayload) {
        let Some(sink) = &self.sink else {
            return;
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        (sink)(SessionEvent {
            session_id: self.session_id,
            seq,
            timestamp: Utc::now(),
            payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn emitter_numbers_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: SessionEventSink = Arc::new(move |event: SessionEvent| {
            sink_seen.lock().unwrap().push(event.seq);
        });
        let emitter = SessionEventEmitter::new(Uuid::new_v4(), Some(sink));

        emitter.emit(SessionEventPayload::FollowUpRequested);
        emitter.emit(SessionEventPayload::Finished(StreamOutcome::Canceled));

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn emitter_without_sink_is_silent() {
        let emitter = SessionEventEmitter::new(Uuid::new_v4(), None);
        emitter.emit(SessionEventPayload::FollowUpRequested);
    }
}
