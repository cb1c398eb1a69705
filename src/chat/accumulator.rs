//! Reassembly of tool calls streamed as fragments.

use std::collections::HashMap;

use crate::types::{ToolCall, ToolCallFragment};

#[derive(Debug, Default)]
struct Slot {
    /// The provider's call id, once seen.
    id: Option<String>,
    /// Key the slot was created under (id or index).
    key: String,
    name: String,
    arguments: String,
}

/// Accumulates [`ToolCallFragment`]s into complete calls.
///
/// Fragments route by call id when present and by positional index
/// otherwise. An index first seen together with an id keeps routing to that
/// id's slot, so providers that send the id only on the first fragment
/// still land in one slot. Single-writer: drive it from the one task that
/// consumes the event stream.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    slots: Vec<Slot>,
    by_id: HashMap<String, usize>,
    by_index: HashMap<u32, usize>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fragment.
    ///
    /// The name is taken from the first fragment that carries one; argument
    /// chunks are appended in arrival order.
    pub fn ingest(&mut self, fragment: ToolCallFragment) {
        let position = self.route(&fragment);
        let slot = &mut self.slots[position];

        if slot.name.is_empty() {
            if let Some(name) = fragment.name {
                slot.name = name;
            }
        }
        slot.arguments.push_str(&fragment.arguments_chunk);
    }

    fn route(&mut self, fragment: &ToolCallFragment) -> usize {
        let id = fragment.id.as_deref().filter(|id| !id.is_empty());

        if let Some(id) = id {
            if let Some(&position) = self.by_id.get(id) {
                self.by_index.insert(fragment.index, position);
                return position;
            }
            // A slot opened by index alone adopts the id when it arrives.
            if let Some(&position) = self.by_index.get(&fragment.index) {
                if self.slots[position].id.is_none() {
                    self.slots[position].id = Some(id.to_string());
                    self.by_id.insert(id.to_string(), position);
                    return position;
                }
            }
        } else if let Some(&position) = self.by_index.get(&fragment.index) {
            return position;
        }

        let position = self.slots.len();
        self.slots.push(Slot {
            id: id.map(str::to_string),
            key: fragment.key(),
            ..Default::default()
        });
        if let Some(id) = id {
            self.by_id.insert(id.to_string(), position);
        }
        self.by_index.insert(fragment.index, position);
        position
    }

    /// Calls accumulated so far, in order of first appearance.
    ///
    /// A call that never received an id reports its routing key instead.
    pub fn snapshot(&self) -> Vec<ToolCall> {
        self.slots
            .iter()
            .map(|slot| ToolCall {
                id: slot.id.clone().unwrap_or_else(|| slot.key.clone()),
                name: slot.name.clone(),
                arguments: slot.arguments.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
