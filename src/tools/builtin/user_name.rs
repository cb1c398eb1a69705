//! Reports the user's configured name.

use async_trait::async_trait;

use crate::error::RelistaError;
use crate::tools::{ToolArguments, ToolCapability, ToolExecutionContext, ToolParameters};

pub const USER_NAME_TOOL_NAME: &str = "user_name";

pub struct UserNameTool {
    user_name: String,
    parameters: ToolParameters,
}

impl UserNameTool {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            parameters: ToolParameters::empty(),
        }
    }
}

#[async_trait]
impl ToolCapability for UserNameTool {
    fn name(&self) -> &str {
        USER_NAME_TOOL_NAME
    }

    fn display_name(&self) -> &str {
        "User Name"
    }

    fn description(&self) -> &str {
        "Look up the name the user has asked to be called."
    }

    fn icon(&self) -> &str {
        "person"
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn summarize(&self, _args: &ToolArguments) -> String {
        "Looked up your name".to_string()
    }

    async fn execute(
        &self,
        _args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError> {
        let name = self.user_name.trim();
        if name.is_empty() {
            Ok("The user has not set a name.".to_string())
        } else {
            Ok(name.to_string())
        }
    }
}
