use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use recipehub::hub::{HubEndpoints, DEFAULT_DETAIL_URL, DEFAULT_LISTING_URL, DEFAULT_SORT_TYPE};
use recipehub::merge::DEFAULT_PAGE_SIZE;

/// Default dataset file, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "recipes.json";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Paginated listing endpoint
    pub listing_url: ConfigValue<String>,
    /// Per-recipe endpoint, `{id}` is replaced by the recipe id
    pub detail_url: ConfigValue<String>,
    /// Authorization credential; never serialized
    #[serde(skip_serializing)]
    pub bearer: Option<ConfigValue<String>>,
    pub page_size: ConfigValue<u32>,
    pub sort_type: ConfigValue<String>,
    /// Dataset file written by `fetch`
    pub output: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    listing_url: Option<String>,
    detail_url: Option<String>,
    bearer: Option<String>,
    page_size: Option<u32>,
    sort_type: Option<String>,
    output: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut listing_url =
            ConfigValue::new(DEFAULT_LISTING_URL.to_string(), ConfigSource::Default);
        let mut detail_url = ConfigValue::new(DEFAULT_DETAIL_URL.to_string(), ConfigSource::Default);
        let mut bearer = None;
        let mut page_size = ConfigValue::new(DEFAULT_PAGE_SIZE, ConfigSource::Default);
        let mut sort_type = ConfigValue::new(DEFAULT_SORT_TYPE.to_string(), ConfigSource::Default);
        let mut output = ConfigValue::new(PathBuf::from(DEFAULT_OUTPUT), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = if contents.trim().is_empty() {
                ConfigFile::default()
            } else {
                serde_yaml::from_str(&contents)
                    .map_err(|e| ConfigError::ParseError(path.clone(), e))?
            };

            config_file = Some(path.clone());

            if let Some(url) = file_config.listing_url {
                listing_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(url) = file_config.detail_url {
                detail_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(token) = file_config.bearer {
                bearer = Some(ConfigValue::new(token, ConfigSource::File));
            }
            if let Some(size) = file_config.page_size {
                if size == 0 {
                    return Err(ConfigError::InvalidValue(
                        path.clone(),
                        "page_size must be at least 1".to_string(),
                    ));
                }
                page_size = ConfigValue::new(size, ConfigSource::File);
            }
            if let Some(sort) = file_config.sort_type {
                sort_type = ConfigValue::new(sort, ConfigSource::File);
            }
            if let Some(out) = file_config.output {
                // Resolve relative paths against config file's directory
                let resolved = if out.is_relative() {
                    path.parent().map(|p| p.join(&out)).unwrap_or(out)
                } else {
                    out
                };
                output = ConfigValue::new(resolved, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("RECIPEHUB_LISTING_URL") {
            listing_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("RECIPEHUB_DETAIL_URL") {
            detail_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(token) = std::env::var("RECIPEHUB_BEARER") {
            bearer = Some(ConfigValue::new(token, ConfigSource::Environment));
        }
        if let Ok(out) = std::env::var("RECIPEHUB_OUTPUT") {
            output = ConfigValue::new(PathBuf::from(out), ConfigSource::Environment);
        }

        Ok(Self {
            listing_url,
            detail_url,
            bearer,
            page_size,
            sort_type,
            output,
            config_file,
        })
    }

    /// Endpoints for building a hub client
    pub fn endpoints(&self) -> HubEndpoints {
        HubEndpoints {
            listing_url: self.listing_url.value.clone(),
            detail_url: self.detail_url.value.clone(),
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/recipehub/
    /// - macOS: ~/Library/Application Support/recipehub/
    /// - Windows: %APPDATA%/recipehub/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipehub")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(path, msg) => {
                write!(f, "Invalid config file '{}': {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
