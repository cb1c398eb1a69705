//! The capability set handed to a streaming session.

use std::sync::Arc;

use super::tool::ToolCapability;
use crate::error::RelistaError;
use crate::provider::ToolDefinition;

#[derive(Clone)]
struct Entry {
    tool: Arc<dyn ToolCapability>,
    enabled: bool,
}

/// Tools available to one session, each marked enabled or disabled.
///
/// Only enabled tools are advertised to the model. A call naming a disabled
/// tool is answered with an error like an unknown name.
#[derive(Clone, Default)]
pub struct CapabilitySet {
    entries: Vec<Entry>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set where every tool is enabled.
    pub fn from_tools(tools: impl IntoIterator<Item = Arc<dyn ToolCapability>>) -> Self {
        tools.into_iter().fold(Self::new(), Self::with)
    }

    /// Add an enabled tool.
    pub fn with(self, tool: Arc<dyn ToolCapability>) -> Self {
        self.with_state(tool, true)
    }

    /// Add a tool that is known but switched off.
    pub fn with_disabled(self, tool: Arc<dyn ToolCapability>) -> Self {
        self.with_state(tool, false)
    }

    pub fn with_state(mut self, tool: Arc<dyn ToolCapability>, enabled: bool) -> Self {
        self.entries.retain(|e| e.tool.name() != tool.name());
        self.entries.push(Entry { tool, enabled });
        self
    }

    /// Find an enabled tool by name.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn ToolCapability>, RelistaError> {
        match self.entries.iter().find(|e| e.tool.name() == name) {
            Some(entry) if entry.enabled => Ok(&entry.tool),
            Some(_) => Err(RelistaError::UnknownTool(format!("{name} (disabled)"))),
            None => Err(RelistaError::UnknownTool(name.to_string())),
        }
    }

    /// Enabled tools, in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<dyn ToolCapability>> {
        self.entries.iter().filter(|e| e.enabled).map(|e| &e.tool)
    }

    /// Definitions of the enabled tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.enabled().map(|t| t.definition()).collect()
    }

    /// True when no tool would be advertised.
    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.tool.name(), e.enabled)))
            .finish()
    }
}
