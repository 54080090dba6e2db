//! Intent dispatcher
//!
//! Routes one utterance to the first handler that claims it:
//! device command, reminder, weather, fixed answers, then chat.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;

use ruby_config::Settings;
use ruby_persistence::ReminderStore;
use ruby_text_processing::{
    canonical_city, clean_city, extract_forecast_date_at, latinize_city, match_device_command,
    parse_reminder_at, to_nfc_lower, CityResolver, CitySource, DeviceCommand, DEFAULT_CITY,
};

use crate::chat::ChatBackend;
use crate::quick_answers::quick_answer_at;
use crate::weather::{WeatherProvider, WeatherReport, WeatherRequest};
use crate::AgentError;

const WEATHER_KEYWORDS: &[&str] = &["thời tiết", "dự báo", "nhiệt độ"];

/// Words that make a bare "trời" a weather question
const SKY_HINTS: &[&str] = &["mưa", "nắng", "nóng", "lạnh", "gió", "bão"];

/// Handler that produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Device,
    Reminder,
    Weather,
    QuickAnswer,
    Chat,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Reminder => "reminder",
            Self::Weather => "weather",
            Self::QuickAnswer => "quick_answer",
            Self::Chat => "chat",
        }
    }
}

/// Reply to one utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<&'static str>,
    /// Reminder time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_command: Option<DeviceCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReport>,
}

impl AssistantReply {
    fn text(intent: Intent, reply: impl Into<String>) -> Self {
        Self {
            intent,
            reply: reply.into(),
            open_url: None,
            datetime: None,
            reminder_id: None,
            device_command: None,
            weather: None,
        }
    }
}

/// City a weather question ends up asking about
#[derive(Debug, Clone, PartialEq, Eq)]
struct WeatherTarget {
    /// Name spoken back to the user
    display: String,
    /// Query sent to the weather service
    query: String,
}

/// Voice assistant core
pub struct Assistant {
    resolver: CityResolver,
    default_city: &'static str,
    country_code: String,
    max_forecast_days: u32,
    reminders: Arc<dyn ReminderStore>,
    weather: Arc<dyn WeatherProvider>,
    chat: Arc<dyn ChatBackend>,
}

impl Assistant {
    /// Assistant with the built-in city tables and default weather settings
    pub fn new(
        reminders: Arc<dyn ReminderStore>,
        weather: Arc<dyn WeatherProvider>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            resolver: CityResolver::new(),
            default_city: DEFAULT_CITY,
            country_code: ruby_config::constants::weather::COUNTRY_CODE.to_string(),
            max_forecast_days: ruby_config::constants::weather::MAX_FORECAST_DAYS,
            reminders,
            weather,
            chat,
        }
    }

    /// Assistant configured from loaded settings
    pub fn from_settings(
        settings: &Settings,
        reminders: Arc<dyn ReminderStore>,
        weather: Arc<dyn WeatherProvider>,
        chat: Arc<dyn ChatBackend>,
    ) -> Result<Self, AgentError> {
        let resolver = settings
            .cities
            .resolver()
            .map_err(|e| AgentError::Configuration(e.to_string()))?;
        let default_city = settings.cities.default_city().ok_or_else(|| {
            AgentError::Configuration(format!(
                "unknown default city: {}",
                settings.cities.default_city
            ))
        })?;

        Ok(Self::new(reminders, weather, chat)
            .with_resolver(resolver)
            .with_default_city(default_city)
            .with_country_code(settings.weather.country_code.clone())
            .with_max_forecast_days(settings.weather.max_forecast_days))
    }

    pub fn with_resolver(mut self, resolver: CityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_default_city(mut self, city: &'static str) -> Self {
        self.default_city = city;
        self
    }

    /// Country appended to domestic city queries; empty disables it
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    pub fn with_max_forecast_days(mut self, days: u32) -> Self {
        self.max_forecast_days = days;
        self
    }

    /// Handle an utterance at the current local time
    pub async fn handle(&self, message: &str) -> Result<AssistantReply, AgentError> {
        self.handle_at(message, Local::now().naive_local()).await
    }

    /// Handle an utterance at local time `now`
    pub async fn handle_at(
        &self,
        message: &str,
        now: NaiveDateTime,
    ) -> Result<AssistantReply, AgentError> {
        let message = message.trim();
        let text = to_nfc_lower(message);

        if let Some(command) = match_device_command(&text) {
            tracing::info!(intent = "device", command = command.as_str(), "Intent matched");
            return Ok(AssistantReply {
                device_command: Some(command),
                ..AssistantReply::text(Intent::Device, command.reply())
            });
        }

        if let Some(parsed) = parse_reminder_at(&text, now) {
            let reminder = self.reminders.create(parsed.remind_at, &parsed.note).await?;
            tracing::info!(
                intent = "reminder",
                reminder_id = reminder.id,
                remind_at = %reminder.remind_at,
                "Intent matched"
            );
            return Ok(AssistantReply {
                datetime: Some(reminder.remind_at),
                reminder_id: Some(reminder.id),
                ..AssistantReply::text(
                    Intent::Reminder,
                    format!(
                        "Đã tạo nhắc nhở lúc {}",
                        reminder.remind_at.format("%H:%M %d/%m/%Y")
                    ),
                )
            });
        }

        if is_weather_question(&text, now) {
            tracing::info!(intent = "weather", "Intent matched");
            return self.weather_at(&text, None, now).await;
        }

        if let Some(answer) = quick_answer_at(&text, now) {
            tracing::info!(intent = "quick_answer", "Intent matched");
            return Ok(AssistantReply {
                open_url: answer.open_url,
                ..AssistantReply::text(Intent::QuickAnswer, answer.reply)
            });
        }

        tracing::info!(intent = "chat", "Intent matched");
        let reply = self.chat.reply(message).await?;
        Ok(AssistantReply::text(Intent::Chat, reply))
    }

    /// Weather answer at the current local time
    pub async fn weather(
        &self,
        message: &str,
        fallback_city: Option<&str>,
    ) -> Result<AssistantReply, AgentError> {
        self.weather_at(message, fallback_city, Local::now().naive_local())
            .await
    }

    /// Weather answer for `message`
    ///
    /// The city comes from the message, then `fallback_city` (for example
    /// the device location), then the configured default.
    pub async fn weather_at(
        &self,
        message: &str,
        fallback_city: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<AssistantReply, AgentError> {
        let today = now.date();
        let target = self.weather_target(message, fallback_city);
        let date = extract_forecast_date_at(message, today);
        let request = WeatherRequest::plan(target.query, date, today, self.max_forecast_days)?;

        tracing::debug!(city = %target.display, ?request, "Fetching weather");
        let report = self.weather.fetch(&request).await.map_err(|e| match e {
            AgentError::UnknownCity(_) => AgentError::UnknownCity(target.display.clone()),
            other => other,
        })?;

        Ok(AssistantReply {
            weather: Some(report.clone()),
            ..AssistantReply::text(Intent::Weather, report.describe(&target.display))
        })
    }

    fn weather_target(&self, message: &str, fallback_city: Option<&str>) -> WeatherTarget {
        if let Some(found) = self.resolver.resolve_or_phrase(message) {
            return match found.source {
                CitySource::Alias | CitySource::CanonicalList => self.domestic(&found.name),
                CitySource::Phrase => foreign(found.name),
            };
        }

        if let Some(fallback) = fallback_city.map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(city) = canonical_city(fallback).or_else(|| self.resolver.resolve(fallback))
            {
                return self.domestic(city);
            }
            let cleaned = clean_city(fallback);
            if !cleaned.is_empty() {
                return foreign(cleaned);
            }
        }

        self.domestic(self.default_city)
    }

    fn domestic(&self, city: &str) -> WeatherTarget {
        let latin = latinize_city(city);
        let query = if self.country_code.is_empty() {
            latin
        } else {
            format!("{},{}", latin, self.country_code)
        };
        WeatherTarget {
            display: city.to_string(),
            query,
        }
    }
}

fn foreign(city: String) -> WeatherTarget {
    WeatherTarget {
        query: latinize_city(&city),
        display: city,
    }
}

fn is_weather_question(text: &str, now: NaiveDateTime) -> bool {
    if WEATHER_KEYWORDS.iter().any(|k| text.contains(k)) {
        return true;
    }
    text.contains("trời")
        && (SKY_HINTS.iter().any(|h| text.contains(h))
            || extract_forecast_date_at(text, now.date()).is_some())
}
