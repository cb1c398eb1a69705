//! Configuration system (layered: code > env > config file > defaults).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RelistaError;
use crate::models::{self, ModelInfo};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-medium-latest";
pub const DEFAULT_TITLE_MODEL: &str = "ministral-3b-latest";
pub const DEFAULT_GREETING_MODEL: &str = "ministral-8b-latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Layered configuration for Relista.
///
/// Resolution order for every field:
/// 1. Explicit setters (`with_*`)
/// 2. Environment variables (a `.env` file is loaded if present)
/// 3. The TOML config file
/// 4. Built-in defaults
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelistaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    greeting_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    /// Per-tool enable flags keyed by tool name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tools: BTreeMap<String, bool>,
}

impl std::fmt::Debug for RelistaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelistaConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("title_model", &self.title_model)
            .field("greeting_model", &self.greeting_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_name", &self.user_name)
            .field("tools", &self.tools)
            .finish()
    }
}

impl RelistaConfig {
    /// Create an empty config (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the default config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self, RelistaError> {
        let base = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::new(),
        };
        Ok(base.merge_env())
    }

    /// Load from environment variables only.
    pub fn from_env() -> Self {
        Self::new().merge_env()
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, RelistaError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            RelistaError::Configuration(format!("invalid config {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Write this config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), RelistaError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| RelistaError::Configuration(format!("cannot encode config: {e}")))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Platform config file location (e.g. `~/.config/relista/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("app", "relista", "relista")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay environment variables on top of this config.
    pub fn merge_env(mut self) -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let env = |names: &[&str]| names.iter().find_map(|name| std::env::var(name).ok());

        if let Some(key) = env(&["RELISTA_API_KEY", "MISTRAL_API_KEY", "OPENROUTER_API_KEY"]) {
            self.api_key = Some(key);
        }
        if let Some(url) = env(&["RELISTA_BASE_URL"]) {
            self.base_url = Some(url);
        }
        if let Some(provider) = env(&["RELISTA_PROVIDER"]) {
            self.provider = Some(provider);
        }
        if let Some(model) = env(&["RELISTA_MODEL"]) {
            self.model = Some(model);
        }
        if let Some(model) = env(&["RELISTA_TITLE_MODEL"]) {
            self.title_model = Some(model);
        }
        if let Some(model) = env(&["RELISTA_GREETING_MODEL"]) {
            self.greeting_model = Some(model);
        }
        if let Some(secs) = env(&["RELISTA_TIMEOUT_SECS"]).and_then(|s| s.parse().ok()) {
            self.timeout_secs = Some(secs);
        }
        if let Some(name) = env(&["RELISTA_USER_NAME"]) {
            self.user_name = Some(name);
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Name reported by the transport in logs.
    pub fn provider_name(&self) -> String {
        self.provider.clone().unwrap_or_else(|| "mistral".to_string())
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn title_model(&self) -> String {
        self.title_model
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE_MODEL.to_string())
    }

    pub fn greeting_model(&self) -> String {
        self.greeting_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING_MODEL.to_string())
    }

    /// Catalog entry for the chat model, if it is a known model.
    pub fn model_info(&self) -> Option<&'static ModelInfo> {
        models::find(&self.model())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Default system instructions used when no agent is active.
    pub fn default_instructions(&self) -> &str {
        self.instructions.as_deref().unwrap_or("")
    }

    pub fn user_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("")
    }

    /// Explicit enable flag for a tool, if one was stored.
    pub fn tool_enabled(&self, tool_name: &str) -> Option<bool> {
        self.tools.get(tool_name).copied()
    }

    pub fn set_tool_enabled(&mut self, tool_name: &str, enabled: bool) {
        self.tools.insert(tool_name.to_string(), enabled);
    }

    pub fn tool_flags(&self) -> &BTreeMap<String, bool> {
        &self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_when_unset() {
        let config = RelistaConfig::new();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.title_model(), DEFAULT_TITLE_MODEL);
        assert_eq!(config.greeting_model(), DEFAULT_GREETING_MODEL);
        assert_eq!(config.model_info().map(|m| m.name), Some("Mistral Medium"));
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.api_key(), None);
        assert_eq!(config.tool_enabled("memory"), None);
    }

    #[test]
    fn parses_toml_file_with_tool_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
api_key = "file-key"
model = "mistral-small-latest"
timeout_secs = 30

[tools]
memory = false
web_search = true
"#,
        )
        .unwrap();

        let config = RelistaConfig::from_file(&path).unwrap();

        assert_eq!(config.api_key(), Some("file-key".to_string()));
        assert_eq!(config.model(), "mistral-small-latest");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.tool_enabled("memory"), Some(false));
        assert_eq!(config.tool_enabled("web_search"), Some(true));
    }

    #[test]
    fn save_then_load_keeps_tool_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = RelistaConfig::new().with_model("open-mistral-nemo");
        config.set_tool_enabled("memory", false);

        config.save(&path).unwrap();
        let loaded = RelistaConfig::from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_file_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();

        let err = RelistaConfig::from_file(&path).unwrap_err();

        assert!(matches!(err, RelistaError::Configuration(_)));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = RelistaConfig::new().with_api_key("sk-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
    }
}
