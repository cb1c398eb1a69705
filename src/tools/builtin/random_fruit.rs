//! Picks a random fruit. Handy for checking that tool calls work end to end.

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::error::RelistaError;
use crate::tools::{ToolArguments, ToolCapability, ToolExecutionContext, ToolParameters};

pub const RANDOM_FRUIT_TOOL_NAME: &str = "random_fruit";

const FRUITS: &[&str] = &[
    "apple",
    "banana",
    "cherry",
    "kiwi",
    "mango",
    "orange",
    "pear",
    "pineapple",
    "strawberry",
    "watermelon",
];

pub struct RandomFruitTool {
    parameters: ToolParameters,
}

impl RandomFruitTool {
    pub fn new() -> Self {
        Self {
            parameters: ToolParameters::empty(),
        }
    }
}

impl Default for RandomFruitTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolCapability for RandomFruitTool {
    fn name(&self) -> &str {
        RANDOM_FRUIT_TOOL_NAME
    }

    fn display_name(&self) -> &str {
        "Random Fruit"
    }

    fn description(&self) -> &str {
        "Return the name of a randomly chosen fruit."
    }

    fn icon(&self) -> &str {
        "leaf"
    }

    fn default_enabled(&self) -> bool {
        false
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn summarize(&self, _args: &ToolArguments) -> String {
        "Picked a fruit".to_string()
    }

    async fn execute(
        &self,
        _args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError> {
        let fruit = FRUITS
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| RelistaError::tool_execution(RANDOM_FRUIT_TOOL_NAME, "no fruit available"))?;
        Ok((*fruit).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn picks_a_known_fruit() {
        let tool = RandomFruitTool::new();
        let args = ToolArguments::parse("").unwrap();

        for _ in 0..20 {
            let fruit = tool.execute(&args, &ToolExecutionContext::default()).await.unwrap();
            assert!(FRUITS.contains(&fruit.as_str()), "{fruit}");
        }
        assert!(!tool.default_enabled());
    }
}
