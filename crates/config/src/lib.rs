//! Configuration loading, validation, and management for Marquee.
//!
//! Loads configuration from `~/.marquee/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.marquee/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model used for every generation round
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max output tokens per generation round
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Turn-orchestration settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// TMDB movie-data settings
    #[serde(default)]
    pub tmdb: TmdbConfig,

    /// SerpAPI showtimes settings
    #[serde(default)]
    pub serp: SerpConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    500
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("assistant", &self.assistant)
            .field("tmdb", &self.tmdb)
            .field("serp", &self.serp)
            .finish()
    }
}

/// Turn-orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Whether ticket purchases require a separate confirmation call
    /// (the five-function, two-step variant). When false, `buy_ticket`
    /// completes the purchase directly and `confirm_ticket_purchase` is
    /// not exposed to the model.
    #[serde(default = "default_true")]
    pub confirm_purchases: bool,

    /// Hard ceiling on generation rounds per user turn
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// How many identical (name, args) dispatches are allowed per turn
    /// before the dispatcher is skipped and a diagnostic is fed back
    #[serde(default = "default_repeat_limit")]
    pub repeat_limit: u32,
}

fn default_true() -> bool {
    true
}
fn default_max_rounds() -> u32 {
    8
}
fn default_repeat_limit() -> u32 {
    3
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            confirm_purchases: true,
            max_rounds: default_max_rounds(),
            repeat_limit: default_repeat_limit(),
        }
    }
}

/// TMDB movie-data settings (now-playing listings and reviews).
#[derive(Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_tmdb_url")]
    pub api_url: String,
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".into()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_tmdb_url(),
        }
    }
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// SerpAPI settings (showtimes lookups).
#[derive(Clone, Serialize, Deserialize)]
pub struct SerpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_serp_url")]
    pub api_url: String,
}

fn default_serp_url() -> String {
    "https://serpapi.com/search".into()
}

impl Default for SerpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_serp_url(),
        }
    }
}

impl std::fmt::Debug for SerpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.marquee/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `MARQUEE_API_KEY`, then `OPENAI_API_KEY` — completion backend key
    /// - `MARQUEE_MODEL` — model identifier
    /// - `TMDB_API_KEY` — TMDB key
    /// - `SERPAPI_API_KEY` — SerpAPI key
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("MARQUEE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("MARQUEE_MODEL") {
            config.model = model;
        }

        if config.tmdb.api_key.is_none() {
            config.tmdb.api_key = std::env::var("TMDB_API_KEY").ok();
        }

        if config.serp.api_key.is_none() {
            config.serp.api_key = std::env::var("SERPAPI_API_KEY").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".marquee")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }

        if self.assistant.max_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "assistant.max_rounds must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if a completion API key is available (config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            assistant: AssistantConfig::default(),
            tmdb: TmdbConfig::default(),
            serp: SerpConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
