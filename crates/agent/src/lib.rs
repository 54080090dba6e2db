//! Intent dispatching for the Ruby assistant
//!
//! Features:
//! - Fixed-priority intent routing (device → reminder → weather → quick answers → chat)
//! - Weather lookups through a pluggable `WeatherProvider` (OpenWeatherMap-compatible client)
//! - Chat fallback through a pluggable `ChatBackend` (OpenRouter-compatible client)
//! - Reminder creation through `ruby_persistence::ReminderStore`

pub mod chat;
pub mod dispatcher;
pub mod quick_answers;
pub mod weather;

pub use chat::{ChatBackend, OpenRouterBackend, OpenRouterConfig};
pub use dispatcher::{Assistant, AssistantReply, Intent};
pub use quick_answers::{quick_answer_at, QuickAnswer};
pub use weather::{
    OpenWeatherClient, OpenWeatherConfig, WeatherProvider, WeatherReport, WeatherRequest,
};

use chrono::NaiveDate;
use ruby_persistence::PersistenceError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("City not found by weather service: {0}")]
    UnknownCity(String),

    #[error("Forecast date {date} is outside the {max_days}-day window")]
    ForecastOutOfRange { date: NaiveDate, max_days: u32 },

    #[error("Chat service error: {0}")]
    Chat(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl AgentError {
    /// Vietnamese text to speak back instead of the raw error
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownCity(city) => {
                format!("Xin lỗi, mình không tìm thấy thông tin thời tiết cho {}.", city)
            }
            Self::ForecastOutOfRange { max_days, .. } => format!(
                "Xin lỗi, mình chỉ xem được dự báo thời tiết trong {} ngày tới.",
                max_days
            ),
            _ => "Xin lỗi, có lỗi xảy ra".to_string(),
        }
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weather(_) => "weather",
            Self::UnknownCity(_) => "unknown_city",
            Self::ForecastOutOfRange { .. } => "forecast_out_of_range",
            Self::Chat(_) => "chat",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Configuration(_) => "configuration",
            Self::Persistence(_) => "persistence",
        }
    }
}
