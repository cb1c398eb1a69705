//! Built-in tools.

pub mod memory;
pub mod random_fruit;
pub mod user_name;
pub mod web_search;

pub use memory::{memory_context, InMemoryStore, MemoryScope, MemoryStore, MemoryTool};
pub use random_fruit::RandomFruitTool;
pub use user_name::UserNameTool;
pub use web_search::{SearchBackend, SearchResult, WebSearchTool};
