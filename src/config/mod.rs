//! Configuration management for rdf-autocomplete
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::completion::CompletionRegistry;
use crate::error::{ConfigError, Result};

/// Prefix of environment variable overrides
const ENV_PREFIX: &str = "RDF_AUTOCOMPLETE_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion engine configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Vocabulary retrieval configuration
    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Enable autocompletion
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Syntax used when none can be derived from a file name
    #[serde(default = "default_syntax")]
    pub default_syntax: String,

    /// Start loading vocabulary terms for namespaces found in documents
    #[serde(default = "default_auto_load_terms")]
    pub auto_load_terms: bool,
}

/// Vocabulary retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Dereference namespace URIs over HTTP
    #[serde(default = "default_online")]
    pub online: bool,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory holding `<prefix>.ttl` fallback copies
    #[serde(default)]
    pub bundled_directory: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_enabled() -> bool {
    true
}

fn default_syntax() -> String {
    "Turtle".to_string()
}

fn default_auto_load_terms() -> bool {
    true
}

fn default_online() -> bool {
    true
}

fn default_timeout() -> u64 {
    15
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_syntax: default_syntax(),
            auto_load_terms: default_auto_load_terms(),
        }
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            online: default_online(),
            timeout: default_timeout(),
            bundled_directory: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration with proper precedence
    ///
    /// An explicit path must exist; the default path is optional.
    ///
    /// # Arguments
    /// * `path` - Optional explicit configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Merged configuration or error
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(file_config.merge_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides on top of this configuration
    ///
    /// Variables are prefixed with `RDF_AUTOCOMPLETE_`,
    /// e.g. `RDF_AUTOCOMPLETE_VOCABULARY_ONLINE=false`. Unparseable values are ignored.
    ///
    /// # Arguments
    /// * `lookup` - Variable lookup, `std::env::var` in production
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let flag = |name: &str| var(name).and_then(|v| parse_bool(&v));

        if let Some(enabled) = flag("COMPLETION_ENABLED") {
            self.completion.enabled = enabled;
        }
        if let Some(syntax) = var("COMPLETION_DEFAULT_SYNTAX") {
            self.completion.default_syntax = syntax;
        }
        if let Some(auto_load) = flag("COMPLETION_AUTO_LOAD_TERMS") {
            self.completion.auto_load_terms = auto_load;
        }
        if let Some(online) = flag("VOCABULARY_ONLINE") {
            self.vocabulary.online = online;
        }
        if let Some(timeout) = var("VOCABULARY_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.vocabulary.timeout = timeout;
        }
        if let Some(directory) = var("VOCABULARY_BUNDLED_DIRECTORY") {
            self.vocabulary.bundled_directory = Some(PathBuf::from(directory));
        }
        if let Some(level) = var("LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
        self
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rdf-autocomplete")
            .join("config.toml")
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if CompletionRegistry::canonical_name(&self.completion.default_syntax).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "completion.default_syntax".to_string(),
                value: self.completion.default_syntax.clone(),
            }
            .into());
        }

        if self.vocabulary.timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vocabulary.timeout".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if let Some(directory) = &self.vocabulary.bundled_directory {
            if !directory.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "vocabulary.bundled_directory".to_string(),
                    value: directory.display().to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Get vocabulary retrieval timeout as Duration
    pub fn vocabulary_timeout(&self) -> Duration {
        Duration::from_secs(self.vocabulary.timeout)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse a level name, ignoring case
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.completion.enabled);
        assert_eq!(config.completion.default_syntax, "Turtle");
        assert!(config.vocabulary.online);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [vocabulary]
            online = false
            "#,
        )
        .unwrap();
        assert!(!config.vocabulary.online);
        assert_eq!(config.vocabulary.timeout, 15);
        assert!(config.completion.enabled);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.completion.default_syntax = "SparqlQuery11".to_string();
        config.logging.level = LogLevel::Debug;
        config.save(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("RDF_AUTOCOMPLETE_VOCABULARY_ONLINE", "false"),
            ("RDF_AUTOCOMPLETE_VOCABULARY_TIMEOUT", "3"),
            ("RDF_AUTOCOMPLETE_LOG_LEVEL", "TRACE"),
            ("RDF_AUTOCOMPLETE_COMPLETION_ENABLED", "maybe"),
        ]);
        let config = Config::default().merge_env(|key| vars.get(key).map(|v| v.to_string()));

        assert!(!config.vocabulary.online);
        assert_eq!(config.vocabulary_timeout(), Duration::from_secs(3));
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(config.completion.enabled);
    }

    #[test]
    fn test_validate_rejects_unknown_syntax() {
        let mut config = Config::default();
        config.completion.default_syntax = "RdfXml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.vocabulary.timeout = 0;
        assert!(config.validate().is_err());
    }
}
