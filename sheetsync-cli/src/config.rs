use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

use sheetsync_core::{SheetConfig, DEFAULT_API_BASE_URL, DEFAULT_PRIMARY_KEY};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    CommandLine,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::CommandLine => write!(f, "command line"),
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

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// OAuth2 access token for the Sheets API
    #[serde(serialize_with = "redact")]
    pub access_token: ConfigValue<Option<String>>,
    /// Spreadsheet identifier
    pub spreadsheet: ConfigValue<Option<String>>,
    /// Worksheet (tab) name
    pub worksheet: ConfigValue<String>,
    /// Column matching records to rows
    pub primary_key: ConfigValue<String>,
    /// Reuse the remote feed across records
    pub cache_feed: ConfigValue<bool>,
    /// Identity reported to the API (user agent)
    pub source: ConfigValue<Option<String>>,
    /// Sheets API endpoint
    pub api_base_url: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    access_token: Option<String>,
    spreadsheet: Option<String>,
    worksheet: Option<String>,
    primary_key: Option<String>,
    cache_feed: Option<bool>,
    source: Option<String>,
    api_base_url: Option<String>,
}

fn redact<S: Serializer>(
    token: &ConfigValue<Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let shown = ConfigValue::new(token.value.as_ref().map(|_| "********"), token.source.clone());
    shown.serialize(serializer)
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config.config_file = Some(path.clone());
            config.apply_file(file_config);
        }

        // Apply environment variable overrides
        config.apply_env(|name| std::env::var(name).ok())?;

        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            access_token: ConfigValue::new(None, ConfigSource::Default),
            spreadsheet: ConfigValue::new(None, ConfigSource::Default),
            worksheet: ConfigValue::new("Sheet1".to_string(), ConfigSource::Default),
            primary_key: ConfigValue::new(DEFAULT_PRIMARY_KEY.to_string(), ConfigSource::Default),
            cache_feed: ConfigValue::new(false, ConfigSource::Default),
            source: ConfigValue::new(None, ConfigSource::Default),
            api_base_url: ConfigValue::new(DEFAULT_API_BASE_URL.to_string(), ConfigSource::Default),
            config_file: None,
        }
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let src = || ConfigSource::File;
        if let Some(token) = file.access_token {
            self.access_token.set(Some(token), src());
        }
        if let Some(id) = file.spreadsheet {
            self.spreadsheet.set(Some(id), src());
        }
        if let Some(name) = file.worksheet {
            self.worksheet.set(name, src());
        }
        if let Some(pk) = file.primary_key {
            self.primary_key.set(pk, src());
        }
        if let Some(cache) = file.cache_feed {
            self.cache_feed.set(cache, src());
        }
        if let Some(source) = file.source {
            self.source.set(Some(source), src());
        }
        if let Some(url) = file.api_base_url {
            self.api_base_url.set(url, src());
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let src = || ConfigSource::Environment;
        if let Some(token) = var("SHEETSYNC_ACCESS_TOKEN") {
            self.access_token.set(Some(token), src());
        }
        if let Some(id) = var("SHEETSYNC_SPREADSHEET") {
            self.spreadsheet.set(Some(id), src());
        }
        if let Some(name) = var("SHEETSYNC_WORKSHEET") {
            self.worksheet.set(name, src());
        }
        if let Some(pk) = var("SHEETSYNC_PRIMARY_KEY") {
            self.primary_key.set(pk, src());
        }
        if let Some(cache) = var("SHEETSYNC_CACHE_FEED") {
            let parsed = parse_bool(&cache)
                .ok_or_else(|| ConfigError::InvalidValue("SHEETSYNC_CACHE_FEED".to_string(), cache))?;
            self.cache_feed.set(parsed, src());
        }
        if let Some(source) = var("SHEETSYNC_SOURCE") {
            self.source.set(Some(source), src());
        }
        if let Some(url) = var("SHEETSYNC_API_BASE_URL") {
            self.api_base_url.set(url, src());
        }
        Ok(())
    }

    /// Forces feed caching on from a command-line flag.
    pub fn enable_cache_feed(&mut self) {
        self.cache_feed.set(true, ConfigSource::CommandLine);
    }

    /// Builds the sheet settings, failing if no spreadsheet is configured.
    pub fn sheet_config(&self) -> Result<SheetConfig, ConfigError> {
        let spreadsheet = self
            .spreadsheet
            .value
            .clone()
            .ok_or(ConfigError::Missing("spreadsheet"))?;
        Ok(SheetConfig::new(spreadsheet, self.worksheet.value.clone())
            .primary_key(self.primary_key.value.clone())
            .cache_feed(self.cache_feed.value))
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/sheetsync/
    /// - macOS: ~/Library/Application Support/sheetsync/
    /// - Windows: %APPDATA%/sheetsync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetsync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
    Missing(&'static str),
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
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
            ConfigError::Missing(key) => write!(
                f,
                "No {} configured. Set it in the config file or via SHEETSYNC_{}.",
                key,
                key.to_ascii_uppercase()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
