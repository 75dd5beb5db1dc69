//! TOML configuration.
//!
//! ```toml
//! [db]
//! path = "./data/pitchlens.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:8000"
//! frontend_url = "http://localhost:5173"
//!
//! [models]
//! provider = "huggingface"
//! ```
//!
//! Every section except `[db]` may be omitted.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origin. Any origin is allowed when unset.
    #[serde(default)]
    pub frontend_url: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            frontend_url: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_summarizer_model")]
    pub summarizer_model: String,
    #[serde(default = "default_generator_model")]
    pub generator_model: String,
    /// Base URL. Defaults per provider when unset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// End-of-sequence token ID of the generator, sent as its pad token.
    #[serde(default = "default_eos_token_id")]
    pub eos_token_id: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            summarizer_model: default_summarizer_model(),
            generator_model: default_generator_model(),
            url: None,
            timeout_secs: default_timeout_secs(),
            eos_token_id: default_eos_token_id(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_summarizer_model() -> String {
    "facebook/bart-large-cnn".to_string()
}
fn default_generator_model() -> String {
    "distilgpt2".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_eos_token_id() -> Option<u32> {
    Some(50256)
}

impl ModelConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also append log lines to this file (created if missing).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes must be > 0");
    }

    if config.models.timeout_secs == 0 {
        anyhow::bail!("models.timeout_secs must be > 0");
    }

    match config.models.provider.as_str() {
        "disabled" | "huggingface" | "ollama" => {}
        other => anyhow::bail!(
            "Unknown model provider: '{}'. Must be disabled, huggingface, or ollama.",
            other
        ),
    }

    Ok(config)
}
