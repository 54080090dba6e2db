//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use ruby_text_processing::{canonical_city, CityResolver, DEFAULT_CITY};

use crate::constants::{chat, endpoints, env_keys, reminders, timeouts, weather};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - API keys optional
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Weather API
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Chat fallback API
    #[serde(default)]
    pub chat: ChatConfig,

    /// Reminder poller
    #[serde(default)]
    pub reminders: ReminderConfig,

    /// City resolution
    #[serde(default)]
    pub cities: CityConfig,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_weather()?;
        self.validate_chat()?;
        self.validate_reminders()?;
        self.validate_cities()?;

        if self.environment.is_strict() {
            self.validate_secrets()?;
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_weather(&self) -> Result<(), ConfigError> {
        let weather = &self.weather;

        if !(1..=weather::MAX_FORECAST_DAYS).contains(&weather.max_forecast_days) {
            return Err(ConfigError::InvalidValue {
                field: "weather.max_forecast_days".to_string(),
                message: format!(
                    "Must be between 1 and {}, got {}",
                    weather::MAX_FORECAST_DAYS,
                    weather.max_forecast_days
                ),
            });
        }

        if weather.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("weather.endpoint".to_string()));
        }

        if weather.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "weather.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_chat(&self) -> Result<(), ConfigError> {
        let chat = &self.chat;

        if chat.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("chat.endpoint".to_string()));
        }

        if chat.model.trim().is_empty() {
            return Err(ConfigError::MissingField("chat.model".to_string()));
        }

        if !(0.0..=2.0).contains(&chat.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "chat.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", chat.temperature),
            });
        }

        if chat.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_reminders(&self) -> Result<(), ConfigError> {
        if self.reminders.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reminders.poll_interval_seconds".to_string(),
                message: "Poll interval must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_cities(&self) -> Result<(), ConfigError> {
        if self.cities.default_city().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "cities.default_city".to_string(),
                message: format!("'{}' is not a known province or city", self.cities.default_city),
            });
        }

        self.cities.resolver().map(|_| ())
    }

    fn validate_secrets(&self) -> Result<(), ConfigError> {
        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField(format!(
                "weather.api_key (or {})",
                env_keys::OPENWEATHER_API_KEY
            )));
        }

        if self.chat.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField(format!(
                "chat.api_key (or {})",
                env_keys::OPENROUTER_API_KEY
            )));
        }

        Ok(())
    }

    /// Effective settings as YAML. API keys are never serialized.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = any origin, for the mobile client)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_timeout() -> u64 {
    timeouts::HTTP_REQUEST_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable the Prometheus endpoint
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// OpenWeatherMap-compatible API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API root; `/weather` and `/forecast` are appended
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,

    /// Set via RUBY__WEATHER__API_KEY or OPENWEATHER_API_KEY
    #[serde(default = "default_weather_api_key", skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Appended to the city query (`q=Hanoi,VN`)
    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u64,

    /// Furthest forecast day the API can serve
    #[serde(default = "default_max_forecast_days")]
    pub max_forecast_days: u32,
}

fn default_weather_endpoint() -> String {
    endpoints::OPENWEATHER_DEFAULT.to_string()
}
fn default_weather_api_key() -> Option<String> {
    std::env::var(env_keys::OPENWEATHER_API_KEY).ok()
}
fn default_units() -> String {
    weather::UNITS.to_string()
}
fn default_language() -> String {
    weather::LANGUAGE.to_string()
}
fn default_country_code() -> String {
    weather::COUNTRY_CODE.to_string()
}
fn default_weather_timeout() -> u64 {
    timeouts::WEATHER_REQUEST_SECS
}
fn default_max_forecast_days() -> u32 {
    weather::MAX_FORECAST_DAYS
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            api_key: default_weather_api_key(),
            units: default_units(),
            language: default_language(),
            country_code: default_country_code(),
            timeout_seconds: default_weather_timeout(),
            max_forecast_days: default_max_forecast_days(),
        }
    }
}

/// OpenRouter-compatible chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API root; `/chat/completions` is appended
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,

    /// Set via RUBY__CHAT__API_KEY or OPENROUTER_API_KEY
    #[serde(default = "default_chat_api_key", skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Persona sent as the system message
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_chat_timeout")]
    pub timeout_seconds: u64,
}

fn default_chat_endpoint() -> String {
    endpoints::OPENROUTER_DEFAULT.to_string()
}
fn default_chat_api_key() -> Option<String> {
    std::env::var(env_keys::OPENROUTER_API_KEY).ok()
}
fn default_model() -> String {
    chat::MODEL.to_string()
}
fn default_system_prompt() -> String {
    chat::SYSTEM_PROMPT.to_string()
}
fn default_max_tokens() -> u32 {
    chat::MAX_TOKENS
}
fn default_temperature() -> f32 {
    chat::TEMPERATURE
}
fn default_chat_timeout() -> u64 {
    timeouts::CHAT_REQUEST_SECS
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            api_key: default_chat_api_key(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_chat_timeout(),
        }
    }
}

/// Background reminder poller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Run the poller at all
    #[serde(default = "default_true")]
    pub poller_enabled: bool,

    /// Seconds between due-reminder checks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

fn default_poll_interval() -> u64 {
    reminders::POLL_INTERVAL_SECS
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poller_enabled: true,
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

/// One configured alias, e.g. `{ alias: "bmt", city: "Đắk Lắk" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityAlias {
    pub alias: String,
    pub city: String,
}

/// City resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityConfig {
    /// Used when a weather question names no city
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Appended after the built-in aliases, in this order
    #[serde(default)]
    pub aliases: Vec<CityAlias>,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            aliases: Vec::new(),
        }
    }
}

impl CityConfig {
    /// Canonical spelling of the configured default city
    pub fn default_city(&self) -> Option<&'static str> {
        canonical_city(&self.default_city)
    }

    /// Built-in resolver extended with the configured aliases
    pub fn resolver(&self) -> Result<CityResolver, ConfigError> {
        CityResolver::new()
            .with_aliases(self.aliases.iter().map(|a| (a.alias.as_str(), a.city.as_str())))
            .map_err(|e| ConfigError::InvalidValue {
                field: "cities.aliases".to_string(),
                message: e.to_string(),
            })
    }
}

/// Load settings from `config/` and the environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (RUBY__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder =
            builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("RUBY")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        aliases = settings.cities.aliases.len(),
        "Settings loaded"
    );

    Ok(settings)
}
