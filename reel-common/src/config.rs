//! Configuration management for Reel Check services.
//!
//! The service reads an optional configuration file at `~/.reelcheck/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! ## Server
//! - `REEL_BIND_ADDRESS` → server.host
//! - `REEL_PORT` → server.port
//!
//! ## Logging
//! - `REEL_LOG_LEVEL` → observability.log_level
//! - `REEL_LOG_FORMAT` → observability.log_format
//!
//! ## LLM engine
//! - `ENABLE_LLM` / `LLM_ENABLED` (`true`) → llm.enabled
//! - `QWEN_API_KEY`, falling back to `LLM_API_KEY` → llm.api_key
//! - `LLM_API_URL` → llm.api_url
//! - `LLM_MODEL` → llm.model

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// DashScope text-generation endpoint used when `llm.api_url` is unset.
pub const DEFAULT_LLM_API_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".reelcheck"),
        |dirs| dirs.home_dir().join(".reelcheck"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Which scoring engine serves analyze requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Deterministic rule engine only.
    Rule,
    /// LLM engine with rule-engine fallback.
    Llm,
}

impl EngineKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Llm => "llm",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default is `127.0.0.1` (local only).
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

/// Alternate LLM scoring engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether the LLM engine may be used at all
    #[serde(default)]
    pub enabled: bool,

    /// API key (DashScope / Qwen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for the generation endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature, kept low for stable scores
    #[serde(default = "default_llm_temperature")]
    pub temperature: f64,

    /// Maximum generated tokens
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            api_url: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// The configured API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// The effective generation endpoint.
    pub fn endpoint(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_LLM_API_URL)
    }

    /// Short, non-secret preview of the API key for diagnostics.
    pub fn api_key_preview(&self) -> Option<String> {
        self.api_key().map(key_preview)
    }
}

/// The first eight characters of a secret followed by `...`.
pub fn key_preview(key: &str) -> String {
    format!("{}...", key.chars().take(8).collect::<String>())
}

fn default_llm_model() -> String {
    "qwen-plus".into()
}

fn default_llm_temperature() -> f64 {
    0.3
}

fn default_llm_max_tokens() -> u32 {
    1500
}

fn default_llm_timeout() -> u64 {
    40
}

/// Accepted script length range, in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            max_text_length: default_max_text_length(),
        }
    }
}

fn default_min_text_length() -> usize {
    10
}

fn default_max_text_length() -> usize {
    5000
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("REEL_BIND_ADDRESS") {
            self.server.host = host;
        }
        if let Some(port) = lookup("REEL_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid REEL_PORT"),
            }
        }

        if let Some(level) = lookup("REEL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("REEL_LOG_FORMAT") {
            self.observability.log_format = format;
        }

        let enabled = lookup("ENABLE_LLM").or_else(|| lookup("LLM_ENABLED"));
        if let Some(flag) = enabled {
            self.llm.enabled = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(key) = lookup("QWEN_API_KEY").or_else(|| lookup("LLM_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.llm.api_url = Some(url);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
    }

    /// The engine that serves analyze requests.
    ///
    /// The LLM engine is only selected when it is enabled and has a key.
    pub fn engine(&self) -> EngineKind {
        if self.llm.enabled && self.llm.api_key().is_some() {
            EngineKind::Llm
        } else {
            EngineKind::Rule
        }
    }

    /// `host:port` string for binding the server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
