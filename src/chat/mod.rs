//! Streaming chat core: fragment accumulation, tool execution and sessions.

pub mod accumulator;
pub mod annotations;
pub mod coordinator;
pub mod events;
pub mod session;

pub use accumulator::ToolCallAccumulator;
pub use annotations::AnnotationCollector;
pub use coordinator::{ToolExecutionCoordinator, ToolOutcome};
pub use events::{SessionEvent, SessionEventPayload, SessionEventSink, SessionId};
pub use session::{CancelHandle, SessionStream, StreamSession};
