//! Text Processing for the Ruby Assistant
//!
//! This crate turns free-text Vietnamese utterances into structured data:
//! - **Accent folding**: Diacritic-insensitive comparison keys
//! - **City resolution**: Province/city names via aliases, the canonical list,
//!   and a "thời tiết ở X" phrase fallback; latinized names for weather APIs
//! - **Forecast dates**: Relative words, weekdays, and `DD/MM` forms
//! - **Reminders**: Action phrase + target timestamp from relative or absolute phrasings
//! - **Device commands**: Fixed phone-control phrases
//!
//! Every extractor is pure and synchronous. A no-match is `None`, never an error.
//!
//! # Example
//!
//! ```
//! use ruby_text_processing::{latinize_city, resolve_city};
//!
//! let city = resolve_city("thời tiết sài gòn hôm nay ra sao").unwrap();
//! assert_eq!(city, "TP Hồ Chí Minh");
//! assert_eq!(latinize_city(city), "Ho Chi Minh");
//! ```

pub mod accents;
pub mod city;
pub mod device;
pub mod forecast_date;
pub mod reminder;

mod error;

pub use error::{Result, TextProcessingError};

pub use accents::{fold_for_match, strip_accents, to_nfc_lower};
pub use city::{
    canonical_city, clean_city, extract_city_phrase, latinize_city, resolve_city, CityMatch,
    CityResolver, CitySource, CANONICAL_CITIES, DEFAULT_CITY,
};
pub use device::{match_device_command, DeviceCommand};
pub use forecast_date::{extract_forecast_date, extract_forecast_date_at, format_iso};
pub use reminder::{
    parse_reminder, parse_reminder_at, ParsedReminder, ReminderPhrasing, ReminderUnit,
    REMINDER_LABEL,
};
