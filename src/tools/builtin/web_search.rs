//! Web search tool backed by a pluggable search backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelistaError;
use crate::tools::{ToolArguments, ToolCapability, ToolExecutionContext, ToolParameters};

pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// Executes searches. Implemented outside this crate.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, RelistaError>;
}

pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    max_results: usize,
    parameters: ToolParameters,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            max_results: 5,
            parameters: ToolParameters::object()
                .string("query", "The search query", true)
                .build(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }
}

fn render_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n{}\n{}", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl ToolCapability for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL_NAME
    }

    fn display_name(&self) -> &str {
        "Web Search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Use this when the answer depends on recent events or facts you are unsure about."
    }

    fn icon(&self) -> &str {
        "globe"
    }

    fn default_enabled(&self) -> bool {
        false
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn summarize(&self, args: &ToolArguments) -> String {
        match args.get_str_opt("query") {
            Some(query) => format!("Searched \"{query}\""),
            None => "Searched the web".to_string(),
        }
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<String, RelistaError> {
        let query = args.get_str("query")?.trim();
        if query.is_empty() {
            return Err(RelistaError::tool_execution(WEB_SEARCH_TOOL_NAME, "empty query"));
        }
        let results = self.backend.search(query, self.max_results).await?;
        Ok(render_results(&results))
    }
}
