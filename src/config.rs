//! Configuration management for romacase.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Application name used for config directory.
const APP_NAME: &str = "romacase";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Default cache filename inside the config directory.
const CACHE_FILENAME: &str = "cache.json";

/// Default dictionary filename inside the config directory.
const DICTIONARY_FILENAME: &str = "dictionary.json";

/// Placeholder value for unconfigured API keys.
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which kanji reading provider to use.
    pub resolver: ResolverConfig,

    /// Offline reading dictionary.
    pub offline: OfflineConfig,

    /// goo labs katakana API.
    pub goo: GooConfig,

    /// OpenAI-compatible completion endpoint.
    pub llm: LlmConfig,

    /// Translation cache settings.
    pub cache: CacheConfig,

    /// HTTP client settings shared by the remote providers.
    pub http: HttpConfig,

    /// File paths.
    pub paths: PathsConfig,
}

/// Kanji reading providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Local reading dictionary, no network.
    #[default]
    Offline,
    /// labs.goo.ne.jp katakana conversion.
    Goo,
    /// LLM completion.
    Llm,
}

/// Provider selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub provider: Provider,
}

/// Offline provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// JSON object of kanji → kana readings, merged over the built-in table.
    pub readings_path: Option<PathBuf>,
}

/// goo labs configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GooConfig {
    /// Application id issued by goo labs.
    pub api_key: String,

    /// Conversion endpoint.
    pub endpoint: String,
}

impl Default for GooConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            endpoint: "https://labs.goo.ne.jp/api/katakana".to_string(),
        }
    }
}

impl GooConfig {
    /// Checks if the API key is configured (not placeholder).
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }
}

/// API configuration for LLM endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (required).
    pub key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// System prompt. The model gets the kanji text as the user message.
    pub prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            key: API_KEY_PLACEHOLDER.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            prompt: "You convert Japanese kanji words to their most likely reading. Reply with the reading in hiragana only, no romaji, no explanations.".to_string(),
        }
    }
}

impl LlmConfig {
    /// Checks if the API key is configured (not placeholder).
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && self.key != API_KEY_PLACEHOLDER
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether resolved tokens are memoized.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Proxy URL. When unset the usual proxy environment variables apply.
    pub proxy: Option<String>,

    /// Request timeout in seconds.
    pub timeout_sec: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_sec: 30,
        }
    }
}

/// File path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Translation cache file.
    pub cache_file: Option<PathBuf>,

    /// User dictionary file.
    pub dictionary_file: Option<PathBuf>,

    /// Command to open an editor on the dictionary.
    /// If not set, will try to auto-detect a suitable editor.
    /// Examples: "kate", "vim", "nano", "code", "notepad"
    pub editor_command: Option<String>,
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the settings the selected provider depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.resolver.provider {
            Provider::Offline => {}
            Provider::Goo => {
                if !self.goo.is_configured() {
                    return Err(ConfigError::MissingValue(
                        "goo.api_key (set your goo labs application id in config file)"
                            .to_string(),
                    ));
                }
                validate_url("goo.endpoint", &self.goo.endpoint)?;
            }
            Provider::Llm => {
                if !self.llm.is_configured() {
                    return Err(ConfigError::MissingValue(
                        "llm.key (set your API key in config file)".to_string(),
                    ));
                }
                validate_url("llm.base_url", &self.llm.base_url)?;
            }
        }

        if let Some(proxy) = &self.http.proxy {
            validate_url("http.proxy", proxy)?;
        }

        if self.http.timeout_sec == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http.timeout_sec".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the effective cache file, using config or default.
    pub fn cache_file(&self) -> Result<PathBuf, ConfigError> {
        match self.paths.cache_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(CACHE_FILENAME)),
        }
    }

    /// Returns the effective dictionary file, using config or default.
    pub fn dictionary_file(&self) -> Result<PathBuf, ConfigError> {
        match self.paths.dictionary_file {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(DICTIONARY_FILENAME)),
        }
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
