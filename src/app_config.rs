use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO 639-1)
    pub source_language: String,

    /// Target language code (ISO 639-1)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Together AI
    Together,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Together => "Together AI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Together => "together".to_string(),
        }
    }

    // @returns: Default model identifier for the provider
    pub fn default_model(&self) -> String {
        match self {
            Self::Gemini => default_gemini_model(),
            Self::Together => default_together_model(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "together" => Ok(Self::Together),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
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

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Together => Self {
                provider_type: "together".to_string(),
                model: default_together_model(),
                api_key: String::new(),
                endpoint: default_together_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Default characters per translation segment when a batch does not
    /// supply its own segment size
    #[serde(default)]
    pub default_segment_size: Option<usize>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: default_available_providers(),
            default_segment_size: None,
        }
    }
}

impl TranslationConfig {
    /// Get the configuration for the active provider
    pub fn get_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_type = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_type)
    }

    /// Get the model for the active provider, falling back to the default
    pub fn get_model(&self) -> String {
        self.get_provider_config()
            .filter(|p| !p.model.is_empty())
            .map(|p| p.model.clone())
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_provider_config()
            .filter(|p| !p.endpoint.is_empty())
            .map(|p| p.endpoint.clone())
            .unwrap_or_else(|| match self.provider {
                TranslationProvider::Gemini => default_gemini_endpoint(),
                TranslationProvider::Together => default_together_endpoint(),
            })
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get the configured API key for the active provider, if any
    pub fn get_api_key(&self) -> String {
        self.get_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_together_model() -> String {
    "meta-llama/Llama-3.3-70B-Instruct-Turbo".to_string()
}

fn default_together_endpoint() -> String {
    "https://api.together.xyz/v1".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(TranslationProvider::Gemini),
        ProviderConfig::new(TranslationProvider::Together),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "es".to_string(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;

        Ok(())
    }

    /// Default configuration file location under the user's config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("batrans").join("conf.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !language_utils::is_supported(&self.source_language) {
            return Err(anyhow!(
                "Unsupported source language: {}",
                self.source_language
            ));
        }

        if !language_utils::is_supported(&self.target_language) {
            return Err(anyhow!(
                "Unsupported target language: {}",
                self.target_language
            ));
        }

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {}",
                self.source_language
            ));
        }

        let provider_config = self
            .translation
            .get_provider_config()
            .ok_or_else(|| anyhow!("No configuration for provider: {}", self.translation.provider))?;

        if !provider_config.endpoint.is_empty() {
            url::Url::parse(&provider_config.endpoint).map_err(|e| {
                anyhow!(
                    "Invalid endpoint for provider {}: {}",
                    self.translation.provider,
                    e
                )
            })?;
        }

        if let Some(segment_size) = self.translation.default_segment_size {
            if segment_size == 0 {
                return Err(anyhow!("Segment size must be greater than zero"));
            }
        }

        Ok(())
    }
}
