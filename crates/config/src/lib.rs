//! Configuration loading, validation, and management for tsprompt.
//!
//! Loads configuration from `~/.tsprompt/config.toml` with environment
//! variable overrides. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tsprompt_core::{PromptType, TsFormat, TsType};

/// The root configuration structure.
///
/// Maps directly to `~/.tsprompt/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider used when none is named on the command line
    #[serde(default = "default_provider")]
    pub default_provider: String,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per model reply
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

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
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("benchmark", &self.benchmark)
            .field("templates", &self.templates)
            .field("providers", &self.providers)
            .finish()
    }
}

/// Settings for one configured model backend.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// `api-version` query parameter, for Azure OpenAI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Defaults for benchmark runs; every field can be overridden per command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub format: TsFormat,

    #[serde(default, rename = "type")]
    pub ts_type: TsType,

    #[serde(default)]
    pub strategy: PromptType,

    /// Readings to forecast
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Unit word for one step of the series
    #[serde(default = "default_timestamp_label")]
    pub timestamp_label: String,

    /// Where dataset names without a path are looked up
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_horizon() -> usize {
    24
}
fn default_timestamp_label() -> String {
    "hour".into()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            format: TsFormat::default(),
            ts_type: TsType::default(),
            strategy: PromptType::default(),
            horizon: default_horizon(),
            timestamp_label: default_timestamp_label(),
            data_dir: default_data_dir(),
        }
    }
}

impl BenchmarkConfig {
    /// Resolve a dataset argument: existing paths are used as given,
    /// bare names are looked up in `data_dir`.
    pub fn dataset_path(&self, dataset: &str) -> PathBuf {
        let given = Path::new(dataset);
        if given.is_absolute() || given.exists() {
            given.to_path_buf()
        } else {
            self.data_dir.join(given)
        }
    }
}

/// Optional template files replacing the built-in prompt for a strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_shot: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub few_shot: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cot: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cot_few: Option<PathBuf>,
}

impl TemplatesConfig {
    pub fn path_for(&self, strategy: PromptType) -> Option<&Path> {
        match strategy {
            PromptType::ZeroShot => self.zero_shot.as_deref(),
            PromptType::FewShot => self.few_shot.as_deref(),
            PromptType::Cot => self.cot.as_deref(),
            PromptType::CotFew => self.cot_few.as_deref(),
        }
    }

    /// Read the override for `strategy`, if one is configured.
    pub fn load(&self, strategy: PromptType) -> Result<Option<String>, ConfigError> {
        let Some(path) = self.path_for(strategy) else {
            return Ok(None);
        };
        std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.tsprompt/config.toml).
    ///
    /// Also checks environment variables:
    /// - `TSPROMPT_API_KEY`, then `OPENAI_API_KEY`, when no key is configured
    /// - `TSPROMPT_PROVIDER` and `TSPROMPT_MODEL` always win over the file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// [`load_from`](Self::load_from) plus the environment overrides of [`load`](Self::load).
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
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

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = var("TSPROMPT_API_KEY").or_else(|| var("OPENAI_API_KEY"));
        }
        if let Some(provider) = var("TSPROMPT_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = var("TSPROMPT_MODEL") {
            self.default_model = model;
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tsprompt")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.benchmark.horizon == 0 {
            return Err(ConfigError::ValidationError(
                "benchmark.horizon must be > 0".into(),
            ));
        }

        if self.benchmark.timestamp_label.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "benchmark.timestamp_label must not be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model to use for `provider`: its own default, else the global one.
    pub fn model_for(&self, provider: &str) -> &str {
        self.providers
            .get(provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            benchmark: BenchmarkConfig::default(),
            templates: TemplatesConfig::default(),
            providers: HashMap::new(),
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
