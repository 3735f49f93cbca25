//! Configuration management for the adventure aggregation service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AggregatorError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the aggregation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the aggregation endpoint listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Ceiling applied to every outbound provider call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Base URL for the geocoding provider
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL for the weather provider
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Weather provider API key
    pub weather_api_key: Option<String>,
    /// Base URL for the news provider
    #[serde(default = "default_news_base_url")]
    pub news_base_url: String,
    /// News provider API key
    pub news_api_key: Option<String>,
    /// Base URL for the chat-completion provider
    #[serde(default = "default_chat_base_url")]
    pub chat_base_url: String,
    /// Process-wide chat API key, used when the caller supplies none
    pub chat_api_key: Option<String>,
    /// Model name sent with every chat completion
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Response-length cap for chat completions
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_timeout_ms() -> u64 {
    8000
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_chat_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_chat_model() -> String {
    "deepseek-chat".to_string()
}

fn default_max_tokens() -> u32 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            geocoding_base_url: default_geocoding_base_url(),
            weather_base_url: default_weather_base_url(),
            weather_api_key: None,
            news_base_url: default_news_base_url(),
            news_api_key: None,
            chat_base_url: default_chat_base_url(),
            chat_api_key: None,
            chat_model: default_chat_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with ADVENTURE_ prefix,
        // e.g. ADVENTURE_PROVIDERS__CHAT_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("ADVENTURE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AggregatorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adventure-aggregator").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.timeout_ms == 0 {
            self.providers.timeout_ms = default_timeout_ms();
        }
        if self.providers.geocoding_base_url.is_empty() {
            self.providers.geocoding_base_url = default_geocoding_base_url();
        }
        if self.providers.weather_base_url.is_empty() {
            self.providers.weather_base_url = default_weather_base_url();
        }
        if self.providers.news_base_url.is_empty() {
            self.providers.news_base_url = default_news_base_url();
        }
        if self.providers.chat_base_url.is_empty() {
            self.providers.chat_base_url = default_chat_base_url();
        }
        if self.providers.chat_model.is_empty() {
            self.providers.chat_model = default_chat_model();
        }
        if self.providers.max_tokens == 0 {
            self.providers.max_tokens = default_max_tokens();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        for (name, key) in [
            ("Weather", &self.providers.weather_api_key),
            ("News", &self.providers.news_api_key),
            ("Chat", &self.providers.chat_api_key),
        ] {
            if let Some(key) = key {
                if key.is_empty() {
                    return Err(AggregatorError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if key.len() > 200 {
                    return Err(AggregatorError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_ms > 60_000 {
            return Err(
                AggregatorError::config("Provider timeout cannot exceed 60000 ms").into(),
            );
        }

        if self.providers.max_tokens > 4096 {
            return Err(AggregatorError::config("max_tokens cannot exceed 4096").into());
        }

        if self.server.port == 0 {
            return Err(AggregatorError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AggregatorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AggregatorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.providers.geocoding_base_url),
            ("Weather", &self.providers.weather_base_url),
            ("News", &self.providers.news_base_url),
            ("Chat", &self.providers.chat_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AggregatorError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.providers.timeout_ms, 8000);
        assert_eq!(
            config.providers.geocoding_base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.providers.max_tokens, 250);
        assert_eq!(config.providers.chat_model, "deepseek-chat");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.chat_api_key.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AggregatorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = AggregatorConfig::default();
        config.providers.chat_api_key = Some(String::new());
        let result = config.validate_api_keys();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AggregatorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AggregatorConfig::default();
        config.providers.timeout_ms = 120_000;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = AggregatorConfig::default();
        config.providers.chat_base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_defaults_fills_blank_values() {
        let mut config = AggregatorConfig::default();
        config.providers.timeout_ms = 0;
        config.providers.chat_model = String::new();
        config.apply_defaults();
        assert_eq!(config.providers.timeout_ms, 8000);
        assert_eq!(config.providers.chat_model, "deepseek-chat");
    }

    #[test]
    fn test_config_path_generation() {
        let path = AggregatorConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("adventure-aggregator"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
