//! Tool system for function calling.

pub mod arguments;
pub mod builtin;
pub mod registry;
pub mod set;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use set::CapabilitySet;
pub use tool::{FnTool, ToolCapability, ToolExecutionContext};
pub use types::{ParameterBuilder, ToolParameters};
pub use validation::validate_arguments;
