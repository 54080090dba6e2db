//! Configuration management for the Ruby assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, then `config/{env}`)
//! - Environment variables (`RUBY__` prefix, `__` between sections)
//!
//! API keys fall back to the conventional `OPENWEATHER_API_KEY` and
//! `OPENROUTER_API_KEY` variables when not set in any file.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, ChatConfig, CityAlias, CityConfig, ObservabilityConfig,
    ReminderConfig, RuntimeEnvironment, ServerConfig, Settings, WeatherConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}
