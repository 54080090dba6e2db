//! Default values shared across the assistant
//!
//! Settings defaults and the collaborators' fallbacks both read from here so
//! the two never drift apart.

/// Service endpoints
pub mod endpoints {
    /// OpenWeatherMap-compatible API root (the `/weather` and `/forecast` parent)
    pub const OPENWEATHER_DEFAULT: &str = "https://api.openweathermap.org/data/2.5";

    /// OpenRouter-compatible chat API root
    pub const OPENROUTER_DEFAULT: &str = "https://openrouter.ai/api/v1";
}

/// Environment variables consulted when a key is not configured
pub mod env_keys {
    pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
    pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
}

/// Timeouts (seconds)
pub mod timeouts {
    pub const HTTP_REQUEST_SECS: u64 = 30;
    pub const WEATHER_REQUEST_SECS: u64 = 10;
    pub const CHAT_REQUEST_SECS: u64 = 60;
}

/// Weather lookups
pub mod weather {
    /// The free forecast endpoint covers 5 days in 3-hour steps
    pub const MAX_FORECAST_DAYS: u32 = 5;
    pub const UNITS: &str = "metric";
    pub const LANGUAGE: &str = "vi";
    pub const COUNTRY_CODE: &str = "VN";
}

/// Chat fallback
pub mod chat {
    pub const MODEL: &str = "openai/gpt-3.5-turbo";

    pub const SYSTEM_PROMPT: &str = "Bạn là Ruby, trợ lý ảo nói tiếng Việt tự nhiên, thân thiện, chính xác. \
         Trả lời ngắn gọn, dễ hiểu và đúng ngữ pháp.";

    pub const MAX_TOKENS: u32 = 512;
    pub const TEMPERATURE: f32 = 0.7;
}

/// Reminder poller
pub mod reminders {
    pub const POLL_INTERVAL_SECS: u64 = 60;
}
