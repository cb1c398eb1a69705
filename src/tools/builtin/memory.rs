//! Long-term memory tool.
//!
//! Memories are presented to the model as one numbered list: global
//! memories first, then the active agent's. Indices in tool calls are
//! 1-based positions in that combined list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RelistaError;
use crate::tools::{ToolArguments, ToolCapability, ToolExecutionContext, ToolParameters};

pub const MEMORY_TOOL_NAME: &str = "memory";

const DESCRIPTION: &str = "\
Manage long-term memories that persist across conversations.
Memories are shown to you at the start of every conversation under '## What I remember', numbered 1, 2, 3...

Actions:
- 'add': Save a new fact. Provide 'fact' with the text to store. Use this proactively when the user shares something worth remembering.
- 'delete': Remove an existing memory. Provide 'index' with its number from the list. Only call this for memories that actually exist in the list.
- 'update': Replace an existing memory with corrected text. Provide 'index' with its number and 'fact' with the new text. Only call this for memories that actually exist in the list.

IMPORTANT: For 'delete' and 'update', you MUST use the exact number shown next to the memory in '## What I remember'. Do not guess an index for a memory that is not in the list.";

/// Which memory list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryScope {
    Global,
    Agent(Uuid),
}

/// Storage for memory lists. Persistence is the implementor's concern.
pub trait MemoryStore: Send + Sync {
    fn memories(&self, scope: MemoryScope) -> Result<Vec<String>, RelistaError>;
    fn set_memories(&self, scope: MemoryScope, memories: Vec<String>) -> Result<(), RelistaError>;
}

/// Process-local memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    lists: Mutex<HashMap<MemoryScope, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for InMemoryStore {
    fn memories(&self, scope: MemoryScope) -> Result<Vec<String>, RelistaError> {
        let lists = self
            .lists
            .lock()
            .map_err(|_| RelistaError::InvalidState("memory store lock poisoned".into()))?;
        Ok(lists.get(&scope).cloned().unwrap_or_default())
    }

    fn set_memories(&self, scope: MemoryScope, memories: Vec<String>) -> Result<(), RelistaError> {
        let mut lists = self
            .lists
            .lock()
            .map_err(|_| RelistaError::InvalidState("memory store lock poisoned".into()))?;
        lists.insert(scope, memories);
        Ok(())
    }
}

/// Render the memory suffix appended to the system prompt.
///
/// Returns an empty string when there is nothing to remember.
pub fn memory_context(store: &dyn MemoryStore, agent: Option<Uuid>) -> Result<String, RelistaError> {
    let mut all = store.memories(MemoryScope::Global)?;
    if let Some(agent) = agent {
        all.extend(store.memories(MemoryScope::Agent(agent))?);
    }
    if all.is_empty() {
        return Ok(String::new());
    }
    let numbered = all
        .iter()
        .enumerate()
        .map(|(i, fact)| format!("{}. {fact}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(format!("\n\n## What I remember\n{numbered}"))
}

/// Read/write access to long-term memory, optionally bound to an agent.
pub struct MemoryTool {
    store: Arc<dyn MemoryStore>,
    agent: Option<Uuid>,
    parameters: ToolParameters,
}

impl MemoryTool {
    pub fn new(store: Arc<dyn MemoryStore>, agent: Option<Uuid>) -> Self {
        let parameters = ToolParameters::object()
            .string_enum(
                "action",
                "The operation to perform",
                &["add", "update", "delete"],
                true,
            )
            .string(
                "fact",
                "Required for 'add' and 'update'. The text of the new or corrected memory.",
                false,
            )
            .integer(
                "index",
                "Required for 'update' and 'delete'. The 1-based number of the memory as shown in '## What I remember'.",
                false,
            )
            .build();
        Self {
            store,
            agent,
            parameters,
        }
    }

    pub fn agent(&self) -> Option<Uuid> {
        self.agent
    }

    /// Scope new facts are written to.
    fn write_scope(&self) -> MemoryScope {
        self.agent.map_or(MemoryScope::Global, MemoryScope::Agent)
    }

    /// Map a 1-based combined index onto a scope and position.
    fn locate(&self, index: i64) -> Result<(MemoryScope, usize), RelistaError> {
        let missing = || not_found(index);
        let position = index
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(missing)?;

        let global_len = self.store.memories(MemoryScope::Global)?.len();
        if position < global_len {
            return Ok((MemoryScope::Global, position));
        }
        let agent = self.agent.ok_or_else(missing)?;
        let agent_pos = position - global_len;
        if agent_pos < self.store.memories(MemoryScope::Agent(agent))?.len() {
            Ok((MemoryScope::Agent(agent), agent_pos))
        } else {
            Err(missing())
        }
    }

    /// The fact as given; blank text is rejected.
    fn required_fact<'a>(args: &'a ToolArguments) -> Result<&'a str, RelistaError> {
        match args.get_str_opt("fact") {
            Some(fact) if !fact.trim().is_empty() => Ok(fact),
            _ => Err(RelistaError::tool_execution(MEMORY_TOOL_NAME, "missing or empty fact")),
        }
    }
}

fn not_found(index: i64) -> RelistaError {
    RelistaError::tool_execution(MEMORY_TOOL_NAME, format!("no memory with index {index}"))
}

#[async_trait]
impl ToolCapability for MemoryTool {
    fn name(&self) -> &str {
        MEMORY_TOOL_NAME
    }

    fn display_name(&self) -> &str {
        "Memory"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn icon(&self) -> &str {
        "brain"
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn summarize(&self, args: &ToolArguments) -> String {
        match args.get_str_opt("action").unwrap_or("add") {
            "delete" => "Removed entry",
            "update" => "Updated entry",
            _ => "Added entry",
        }
        .to_string()
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError> {
        let action = args
            .get_str_opt("action")
            .ok_or_else(|| RelistaError::tool_execution(MEMORY_TOOL_NAME, "missing action"))?;

        match action {
            "add" => {
                let fact = Self::required_fact(args)?;
                let scope = self.write_scope();
                let mut list = self.store.memories(scope)?;
                list.push(fact.to_string());
                self.store.set_memories(scope, list)?;
                Ok(fact.to_string())
            }
            "delete" => {
                let index = args.get_i64("index").map_err(|_| {
                    RelistaError::tool_execution(MEMORY_TOOL_NAME, "missing index for delete")
                })?;
                let (scope, position) = self.locate(index)?;
                let mut list = self.store.memories(scope)?;
                if position >= list.len() {
                    return Err(not_found(index));
                }
                let old = list.remove(position);
                self.store.set_memories(scope, list)?;
                Ok(old)
            }
            "update" => {
                let index = args.get_i64("index").map_err(|_| {
                    RelistaError::tool_execution(MEMORY_TOOL_NAME, "missing index for update")
                })?;
                let fact = Self::required_fact(args)?;
                let (scope, position) = self.locate(index)?;
                let mut list = self.store.memories(scope)?;
                let slot = list.get_mut(position).ok_or_else(|| not_found(index))?;
                let old = std::mem::replace(slot, fact.to_string());
                self.store.set_memories(scope, list)?;
                Ok(format!("##### Before:\n{old}\n\n\n##### After:\n{fact}"))
            }
            other => Err(RelistaError::tool_execution(
                MEMORY_TOOL_NAME,
                format!("unknown action: {other}"),
            )),
        }
    }
}
