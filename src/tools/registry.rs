//! Registry of every known tool plus the user's enable flags.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use super::builtin::{
    MemoryStore, MemoryTool, RandomFruitTool, SearchBackend, UserNameTool, WebSearchTool,
};
use super::set::CapabilitySet;
use super::tool::ToolCapability;
use crate::config::RelistaConfig;

/// Produces a tool instance, optionally bound to the active agent.
pub type ToolFactory = Arc<dyn Fn(Option<Uuid>) -> Arc<dyn ToolCapability> + Send + Sync>;

/// All tools the application knows about.
///
/// Tools are toggled per name; a tool never toggled falls back to its
/// `default_enabled`. Agent-scoped tools (memory) are rebuilt for the agent
/// passed to [`ToolRegistry::capabilities_for`].
#[derive(Clone, Default)]
pub struct ToolRegistry {
    factories: Vec<ToolFactory>,
    flags: BTreeMap<String, bool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tools and flags from `config`.
    pub fn standard(
        config: &RelistaConfig,
        memory: Arc<dyn MemoryStore>,
        search: Option<Arc<dyn SearchBackend>>,
    ) -> Self {
        let mut registry = Self::new().with_flags(config.tool_flags().clone());
        if let Some(backend) = search {
            registry.register(Arc::new(WebSearchTool::new(backend)));
        }
        registry.register_scoped(move |agent| -> Arc<dyn ToolCapability> {
            Arc::new(MemoryTool::new(memory.clone(), agent))
        });
        registry.register(Arc::new(RandomFruitTool::new()));
        registry.register(Arc::new(UserNameTool::new(config.user_name())));
        registry
    }

    pub fn with_flags(mut self, flags: BTreeMap<String, bool>) -> Self {
        self.flags = flags;
        self
    }

    /// Register a tool that does not depend on the agent.
    pub fn register(&mut self, tool: Arc<dyn ToolCapability>) {
        self.factories.push(Arc::new(move |_: Option<Uuid>| tool.clone()));
    }

    /// Register a tool rebuilt for each agent.
    pub fn register_scoped<F>(&mut self, factory: F)
    where
        F: Fn(Option<Uuid>) -> Arc<dyn ToolCapability> + Send + Sync + 'static,
    {
        self.factories.push(Arc::new(factory));
    }

    /// Every registered tool, unbound.
    pub fn all(&self) -> Vec<Arc<dyn ToolCapability>> {
        self.factories.iter().map(|f| f(None)).collect()
    }

    pub fn is_enabled(&self, tool: &dyn ToolCapability) -> bool {
        self.flags
            .get(tool.name())
            .copied()
            .unwrap_or_else(|| tool.default_enabled())
    }

    pub fn set_enabled(&mut self, tool_name: &str, enabled: bool) {
        self.flags.insert(tool_name.to_string(), enabled);
    }

    /// Write the current flags back into `config`.
    pub fn store_flags(&self, config: &mut RelistaConfig) {
        for (name, enabled) in &self.flags {
            config.set_tool_enabled(name, *enabled);
        }
    }

    /// Capability set for one session, with scoped tools bound to `agent`.
    pub fn capabilities_for(&self, agent: Option<Uuid>) -> CapabilitySet {
        self.factories.iter().fold(CapabilitySet::new(), |set, factory| {
            let tool = factory(agent);
            let enabled = self.is_enabled(tool.as_ref());
            set.with_state(tool, enabled)
        })
    }

    /// True when at least one tool would be advertised.
    pub fn any_enabled(&self) -> bool {
        self.all().iter().any(|t| self.is_enabled(t.as_ref()))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.factories.len())
            .field("flags", &self.flags)
            .finish()
    }
}
