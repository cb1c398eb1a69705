//! Error classification shared by sessions and callers.

use serde::{Deserialize, Serialize};

/// Broad error category used to route failure handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Out-of-band error payload from the completion endpoint.
    Provider,
    /// Connection, IO, or non-success HTTP status.
    Transport,
    Authentication,
    RateLimit,
    Configuration,
    Serialization,
    /// Accumulated arguments are not valid JSON or violate the tool schema.
    ToolArgument,
    /// The tool itself failed.
    ToolExecution,
    /// The model named a tool that is not registered or is disabled.
    UnknownTool,
    Unknown,
}

/// Structured fields of a provider error payload.
///
/// Missing fields are filled with the `"unknown"` sentinel when decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorDetails {
    pub message: String,
    pub kind: String,
    pub code: String,
}
