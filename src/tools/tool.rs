//! Tool capability trait and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::RelistaError;
use crate::provider::ToolDefinition;

/// Context available during tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    /// Id of the tool call being answered.
    pub tool_call_id: Option<String>,
    pub tool_name: Option<String>,
}

/// A pluggable capability the model can invoke.
///
/// Implementations own their side effects (memory writes, searches); the
/// streaming core only keeps the returned string.
#[async_trait]
pub trait ToolCapability: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Name shown to users.
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Description sent to the model.
    fn description(&self) -> &str;

    /// Icon identifier for UIs.
    fn icon(&self) -> &str {
        "wrench"
    }

    /// Whether the tool is on when the user never toggled it.
    fn default_enabled(&self) -> bool {
        true
    }

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Short, human-readable summary of an invocation.
    fn summarize(&self, _args: &ToolArguments) -> String {
        self.display_name().to_string()
    }

    /// Execute the tool with parsed arguments, returning its textual answer.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError>;

    /// Definition advertised to the provider.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().schema.clone(),
        }
    }
}

type ToolHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, RelistaError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
pub struct FnTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    default_enabled: bool,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, RelistaError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            default_enabled: true,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }

    pub fn disabled_by_default(mut self) -> Self {
        self.default_enabled = false;
        self
    }
}

#[async_trait]
impl ToolCapability for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
