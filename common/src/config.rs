use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_inference_url() -> String {
    "https://api.moondream.ai/v1".to_string()
}
fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_relay_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_rust_log_format() -> String {
    "term".to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: default_inference_url(),
            api_key: String::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

/// Looks up a setting: runtime store, then environment, then TOML/defaults.
pub fn get(name: &str) -> Result<String> {
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    let toml_value = match name {
        "INFERENCE_URL" => Some(CONFIG.inference.url.clone()),
        "MOONDREAM_API_KEY" => Some(CONFIG.inference.api_key.clone()),
        "SERVER_ADDR" => Some(CONFIG.server.addr.clone()),
        "RELAY_URL" => Some(CONFIG.client.relay_url.clone()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

#[allow(dead_code)] // only tests override at runtime
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

#[allow(dead_code)]
pub fn unset(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    if local.inference.url != default_inference_url() {
        base.inference.url = local.inference.url;
    }
    if !local.inference.api_key.is_empty() {
        base.inference.api_key = local.inference.api_key;
    }

    if local.server.addr != default_server_addr() {
        base.server.addr = local.server.addr;
    }

    if local.client.relay_url != default_relay_url() {
        base.client.relay_url = local.client.relay_url;
    }

    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}
