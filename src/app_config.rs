use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::language_utils;
use crate::translation::{PromptShape, RateLimiter, TranslationOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target Minecraft locale code (e.g. "ja_jp")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Minecraft version the output is meant for
    #[serde(default = "default_minecraft_version")]
    pub minecraft_version: String,

    /// Term dictionary file
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    // @engine: OpenAI-compatible chat completions
    #[default]
    OpenAI,
    // @engine: Google Translate (recognised, not implemented)
    Google,
    // @engine: DeepL (recognised, not implemented)
    DeepL,
}

impl Engine {
    // @returns: Capitalized engine name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Google => "Google Translate",
            Self::DeepL => "DeepL",
        }
    }

    // @returns: Lowercase engine identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Google => "google".to_string(),
            Self::DeepL => "deepl".to_string(),
        }
    }

    pub fn is_implemented(&self) -> bool {
        matches!(self, Self::OpenAI)
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "google" => Ok(Self::Google),
            "deepl" => Ok(Self::DeepL),
            _ => Err(ConfigError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Engine identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param engine: Engine enum
    // @returns: Provider config with defaults
    pub fn new(engine: Engine) -> Self {
        Self {
            provider_type: engine.to_lowercase_string(),
            model: match engine {
                Engine::OpenAI => default_openai_model(),
                _ => String::new(),
            },
            api_key: String::new(),
            endpoint: match engine {
                Engine::OpenAI => default_openai_endpoint(),
                _ => String::new(),
            },
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation engine to use
    #[serde(default)]
    pub engine: Engine,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all engines
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Units per request; 1 translates one text at a time with examples
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Minimum similarity (0.0 to 1.0) for a dictionary entry to be used as an example
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum number of examples per single-item prompt
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Send translation keys alongside texts in batch prompts
    #[serde(default = "default_true")]
    pub include_keys: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            similarity_threshold: default_similarity_threshold(),
            max_examples: default_max_examples(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            include_keys: default_true(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "ja_jp".to_string()
}

fn default_minecraft_version() -> String {
    "1.20.1".to_string()
}

fn default_dictionary_path() -> String {
    "dictionary.json".to_string()
}

fn default_concurrent_requests() -> usize {
    1 // one request at a time
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_batch_size() -> usize {
    1
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_max_examples() -> usize {
    3
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_openai_endpoint() -> String {
    crate::providers::openai::DEFAULT_ENDPOINT.to_string()
}

fn default_openai_model() -> String {
    crate::providers::openai::DEFAULT_MODEL.to_string()
}

fn default_rate_limit() -> Option<u32> {
    Some(600) // one request every 100ms
}

impl Config {
    /// Load the configuration file, writing a default one when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply `OPENAI_*` environment overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides using `lookup` to read variables
    ///
    /// Only the OpenAI-compatible engine reads the environment; set, non-empty
    /// variables win over the file.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read("OPENAI_API_KEY").or_else(|| read("ANTHROPIC_API_KEY"));
        let endpoint = read("OPENAI_BASE_URL");
        let model = read("OPENAI_MODEL");

        if api_key.is_none() && endpoint.is_none() && model.is_none() {
            return;
        }

        let provider = self.translation.provider_config_mut(Engine::OpenAI);
        if let Some(api_key) = api_key {
            provider.api_key = api_key;
        }
        if let Some(endpoint) = endpoint {
            provider.endpoint = endpoint;
        }
        if let Some(model) = model {
            provider.model = model;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let engine = self.translation.engine;
        if !engine.is_implemented() {
            return Err(ConfigError::EngineNotImplemented(engine.display_name().to_string()));
        }

        if self.translation.get_api_key().is_empty() {
            return Err(ConfigError::MissingApiKey(engine.display_name().to_string()));
        }

        language_utils::validate_language_code(&self.target_language)?;

        let threshold = self.translation.common.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidSetting {
                name: "similarity_threshold".to_string(),
                reason: format!("{} is outside 0.0..=1.0", threshold),
            });
        }

        if self.translation.optimal_concurrent_requests() == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "concurrent_requests".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Translation options for one run
    pub fn translation_options(&self) -> TranslationOptions {
        let common = &self.translation.common;
        TranslationOptions {
            target_language: self.target_language.to_lowercase(),
            similarity_threshold: common.similarity_threshold,
            batch_size: common.batch_size.max(1),
            max_examples: common.max_examples,
            max_concurrent_requests: self.translation.optimal_concurrent_requests().max(1),
            request_timeout: Duration::from_secs(self.translation.get_timeout_secs()),
            prompt_shape: if common.include_keys {
                PromptShape::Keyed
            } else {
                PromptShape::Positional
            },
        }
    }

    /// Rate limiter for the active engine, if one is configured
    pub fn rate_limiter(&self) -> Option<RateLimiter> {
        self.translation.get_rate_limit().and_then(RateLimiter::per_minute)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            minecraft_version: default_minecraft_version(),
            dictionary_path: default_dictionary_path(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    pub fn optimal_concurrent_requests(&self) -> usize {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.concurrent_requests;
        }

        // Default fallback
        default_concurrent_requests()
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let engine_str = self.engine.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == engine_str)
    }

    /// Provider configuration for `engine`, inserted with defaults when absent
    pub fn provider_config_mut(&mut self, engine: Engine) -> &mut ProviderConfig {
        let engine_str = engine.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == engine_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(engine));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active engine
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_openai_model()
    }

    /// Get the API key for the active engine
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.trim().to_string())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active engine
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        default_openai_endpoint()
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the rate limit for the active engine
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(provider_config) => provider_config.rate_limit,
            None => default_rate_limit(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            available_providers: vec![ProviderConfig::new(Engine::OpenAI)],
            common: TranslationCommonConfig::default(),
        }
    }
}
