//! Configuration loading, validation, and management for steward.
//!
//! Loads configuration from `~/.steward/config.toml` with environment
//! variable overrides. Every setting is an explicit field with a documented
//! default — nothing reads ambient process state after startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.steward/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 = deterministic).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Directory holding the history database, notes file, and calendar
    /// file. Default: `~/.steward`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How many past exchanges seed each new turn. Default: 2.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Upper bound on model calls within a single turn. Default: 12.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whether calendar-mutating tools are registered. Default: true.
    #[serde(default = "default_true")]
    pub allow_calendar_writes: bool,

    /// Discord front-end settings.
    #[serde(default)]
    pub discord: DiscordSettings,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_data_dir() -> PathBuf {
    dirs_home().join(".steward")
}
fn default_history_limit() -> usize {
    2
}
fn default_max_iterations() -> u32 {
    12
}
fn default_true() -> bool {
    true
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
            .field("data_dir", &self.data_dir)
            .field("history_limit", &self.history_limit)
            .field("max_iterations", &self.max_iterations)
            .field("allow_calendar_writes", &self.allow_calendar_writes)
            .field("discord", &self.discord)
            .finish()
    }
}

/// Discord front-end configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DiscordSettings {
    /// Bot token from the Discord developer portal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Allowlist of sender ids. Empty = deny all. ["*"] = allow all.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

impl std::fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("bot_token", &redact(&self.bot_token))
            .field("allowed_users", &self.allowed_users)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.steward/config.toml`).
    ///
    /// Environment overrides, highest priority first:
    /// - `STEWARD_API_KEY`, then `OPENAI_API_KEY`, then `OPENROUTER_API_KEY`
    /// - `STEWARD_MODEL`
    /// - `STEWARD_DATA_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("STEWARD_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("STEWARD_MODEL") {
            config.model = model;
        }

        if let Ok(dir) = std::env::var("STEWARD_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
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
        dirs_home().join(".steward")
    }

    /// The history database path inside the data directory.
    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }

    /// The notes file path inside the data directory.
    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join("notes.md")
    }

    /// The calendar file path inside the data directory.
    pub fn calendar_path(&self) -> PathBuf {
        self.data_dir.join("calendar.json")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
            max_iterations: default_max_iterations(),
            allow_calendar_writes: true,
            discord: DiscordSettings::default(),
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
