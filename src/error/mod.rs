//! Error types for Relista.

pub mod unified;

pub use unified::{ErrorCategory, ProviderErrorDetails};

use thiserror::Error;

/// Primary error type for all Relista operations.
#[derive(Error, Debug)]
pub enum RelistaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Out-of-band error payload sent by the completion endpoint.
    #[error("Provider error ({kind}, code {code}): {message}")]
    Provider {
        message: String,
        kind: String,
        code: String,
    },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid tool arguments for {tool_name}: {message}")]
    ToolArgument { tool_name: String, message: String },

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Unknown or disabled tool: {0}")]
    UnknownTool(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl RelistaError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool_execution(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Provider error details, if this is an out-of-band provider error.
    pub fn provider_details(&self) -> Option<ProviderErrorDetails> {
        match self {
            Self::Provider {
                message,
                kind,
                code,
            } => Some(ProviderErrorDetails {
                message: message.clone(),
                kind: kind.clone(),
                code: code.clone(),
            }),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                _ => ErrorCategory::Transport,
            },
            Self::Network(_) | Self::Io(_) | Self::Stream(_) => ErrorCategory::Transport,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::ToolArgument { .. } | Self::InvalidArgument(_) => ErrorCategory::ToolArgument,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::UnknownTool(_) => ErrorCategory::UnknownTool,
            Self::InvalidState(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is recovered per tool call instead of ending the session.
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::ToolArgument | ErrorCategory::ToolExecution | ErrorCategory::UnknownTool
        )
    }

    /// Whether this error terminates a streaming session.
    pub fn is_fatal(&self) -> bool {
        !self.is_tool_error()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelistaError>;
