//! Tests for configuration resolution.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use relista::config::RelistaConfig;
use relista::error::RelistaError;
use relista::provider::OpenAiCompatibleTransport;
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 9] = [
    "RELISTA_API_KEY",
    "MISTRAL_API_KEY",
    "OPENROUTER_API_KEY",
    "RELISTA_BASE_URL",
    "RELISTA_PROVIDER",
    "RELISTA_MODEL",
    "RELISTA_TITLE_MODEL",
    "RELISTA_TIMEOUT_SECS",
    "RELISTA_USER_NAME",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clean_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn env_overrides_file_values() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "api_key = \"file-key\"\nmodel = \"file-model\"\n").unwrap();

    std::env::set_var("RELISTA_MODEL", "env-model");
    std::env::set_var("RELISTA_TIMEOUT_SECS", "15");

    let config = RelistaConfig::from_file(&path).unwrap().merge_env();

    assert_eq!(config.api_key(), Some("file-key".to_string()));
    assert_eq!(config.model(), "env-model");
    assert_eq!(config.request_timeout(), Duration::from_secs(15));
}

#[test]
fn api_key_env_precedence() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("MISTRAL_API_KEY", "mistral-key");
    std::env::set_var("OPENROUTER_API_KEY", "openrouter-key");
    assert_eq!(RelistaConfig::from_env().api_key(), Some("mistral-key".to_string()));

    std::env::set_var("RELISTA_API_KEY", "relista-key");
    assert_eq!(RelistaConfig::from_env().api_key(), Some("relista-key".to_string()));
}

#[test]
fn invalid_timeout_is_ignored() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("RELISTA_TIMEOUT_SECS", "soon");
    assert_eq!(
        RelistaConfig::from_env().request_timeout(),
        Duration::from_secs(120)
    );
}

#[test]
fn transport_requires_an_api_key() {
    let config = RelistaConfig::new();
    let err = match OpenAiCompatibleTransport::from_config(&config) {
        Ok(_) => panic!("expected missing key error"),
        Err(err) => err,
    };
    match err {
        RelistaError::Configuration(message) => assert!(message.contains("RELISTA_API_KEY")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn transport_uses_configured_base_url() {
    let config = RelistaConfig::new()
        .with_api_key("key")
        .with_base_url("https://openrouter.ai/api/v1/");
    let transport = OpenAiCompatibleTransport::from_config(&config).unwrap();

    assert_eq!(transport.base_url(), "https://openrouter.ai/api/v1");
}

#[test]
fn env_sets_title_model_user_name_and_provider() {
    let _env_lock = env_lock_guard();
    let _env_guard = clean_env();

    std::env::set_var("RELISTA_TITLE_MODEL", "open-mistral-nemo");
    std::env::set_var("RELISTA_USER_NAME", "Sam");
    std::env::set_var("RELISTA_PROVIDER", "openrouter");

    let config = RelistaConfig::from_env();
    assert_eq!(config.title_model(), "open-mistral-nemo");
    assert_eq!(config.user_name(), "Sam");
    assert_eq!(config.provider_name(), "openrouter");
}
