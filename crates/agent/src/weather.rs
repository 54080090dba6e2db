//! Weather lookups
//!
//! `WeatherRequest` is decided from the resolved city and the extracted
//! forecast date; a `WeatherProvider` turns it into a `WeatherReport`.
//! `OpenWeatherClient` talks to an OpenWeatherMap-compatible API:
//! `/weather` for current conditions, `/forecast` (5 days, 3-hour steps) for
//! a given day.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use ruby_config::WeatherConfig;

use crate::AgentError;

/// What to ask the weather service
///
/// `city` is the API query (latinized name, optionally `,<country>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherRequest {
    Current { city: String },
    Forecast { city: String, date: NaiveDate },
}

impl WeatherRequest {
    /// Pick current conditions or a forecast for `date`
    ///
    /// No date, or today, means current conditions. Past dates and dates more
    /// than `max_days` ahead are rejected.
    pub fn plan(
        city: impl Into<String>,
        date: Option<NaiveDate>,
        today: NaiveDate,
        max_days: u32,
    ) -> Result<Self, AgentError> {
        let city = city.into();
        let Some(date) = date else {
            return Ok(Self::Current { city });
        };

        let days_ahead = (date - today).num_days();
        if days_ahead < 0 || days_ahead > i64::from(max_days) {
            return Err(AgentError::ForecastOutOfRange { date, max_days });
        }

        if days_ahead == 0 {
            Ok(Self::Current { city })
        } else {
            Ok(Self::Forecast { city, date })
        }
    }

    pub fn city(&self) -> &str {
        match self {
            Self::Current { city } | Self::Forecast { city, .. } => city,
        }
    }
}

/// Weather summary ready to be spoken
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Location name as returned by the service
    pub location: String,
    /// `None` for current conditions
    pub date: Option<NaiveDate>,
    pub description: String,
    pub temperature: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<u8>,
    /// Highest precipitation probability of the day, percent
    pub rain_chance: Option<u8>,
    pub unit_symbol: String,
}

impl WeatherReport {
    /// Vietnamese sentence for `city` (the name the user should hear)
    pub fn describe(&self, city: &str) -> String {
        let unit = &self.unit_symbol;
        match self.date {
            None => {
                let mut text = format!(
                    "Thời tiết {} hiện tại: {}, nhiệt độ {:.0}{}",
                    city, self.description, self.temperature, unit
                );
                if let Some(humidity) = self.humidity {
                    text.push_str(&format!(", độ ẩm {}%", humidity));
                }
                text.push('.');
                text
            }
            Some(date) => {
                let mut text = format!(
                    "Dự báo thời tiết {} ngày {}: {}",
                    city,
                    date.format("%d/%m/%Y"),
                    self.description
                );
                match (self.temp_min, self.temp_max) {
                    (Some(min), Some(max)) => {
                        text.push_str(&format!(", nhiệt độ từ {:.0}{} đến {:.0}{}", min, unit, max, unit))
                    }
                    _ => text.push_str(&format!(", nhiệt độ {:.0}{}", self.temperature, unit)),
                }
                if let Some(chance) = self.rain_chance {
                    text.push_str(&format!(", khả năng mưa {}%", chance));
                }
                text.push('.');
                text
            }
        }
    }
}

/// Weather service seam
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherReport, AgentError>;
}

/// Configuration for the OpenWeatherMap-compatible client
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    /// API root, e.g. `https://api.openweathermap.org/data/2.5`
    pub endpoint: String,
    pub api_key: Option<String>,
    /// `metric`, `imperial` or `standard`
    pub units: String,
    pub language: String,
    pub timeout: Duration,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self::from(&WeatherConfig::default())
    }
}

impl From<&WeatherConfig> for OpenWeatherConfig {
    fn from(config: &WeatherConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

impl OpenWeatherConfig {
    /// Set endpoint (tests, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn unit_symbol(&self) -> &'static str {
        match self.units.as_str() {
            "metric" => "°C",
            "imperial" => "°F",
            _ => "K",
        }
    }
}

/// OpenWeatherMap-compatible client
pub struct OpenWeatherClient {
    config: OpenWeatherConfig,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, AgentError> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("Weather API key not set; weather questions will fail");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, city: &str) -> Result<T, AgentError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AgentError::Configuration("OPENWEATHER_API_KEY not set".to_string()))?;

        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", self.config.units.as_str()),
                ("lang", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AgentError::Weather(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AgentError::UnknownCity(city.to_string()));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(AgentError::Configuration(
                "weather API key rejected".to_string(),
            ));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Weather(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherReport, AgentError> {
        let unit_symbol = self.config.unit_symbol();

        let result = match request {
            WeatherRequest::Current { city } => self
                .get_json::<CurrentResponse>("weather", city)
                .await
                .map(|current| current.into_report(unit_symbol)),
            WeatherRequest::Forecast { city, date } => self
                .get_json::<ForecastResponse>("forecast", city)
                .await
                .and_then(|forecast| forecast.report_for(*date, unit_symbol)),
        };

        if let Err(e) = &result {
            tracing::warn!(city = request.city(), error = %e, "Weather lookup failed");
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

fn first_description(conditions: &[Condition]) -> String {
    conditions
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<Condition>,
}

impl CurrentResponse {
    fn into_report(self, unit_symbol: &str) -> WeatherReport {
        WeatherReport {
            description: first_description(&self.weather),
            location: self.name,
            date: None,
            temperature: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            rain_chance: None,
            unit_symbol: unit_symbol.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: ForecastCity,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    name: String,
    /// Offset from UTC in seconds
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    /// Unix time (UTC)
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<Condition>,
    /// Probability of precipitation, 0.0..=1.0
    #[serde(default)]
    pop: Option<f64>,
}

impl ForecastResponse {
    /// Summarize the 3-hour entries falling on `date` in the city's local time
    fn report_for(self, date: NaiveDate, unit_symbol: &str) -> Result<WeatherReport, AgentError> {
        let offset = self.city.timezone;
        let day: Vec<(NaiveDateTime, &ForecastEntry)> = self
            .list
            .iter()
            .filter_map(|entry| {
                let local = DateTime::from_timestamp(entry.dt.checked_add(offset)?, 0)?.naive_utc();
                (local.date() == date).then_some((local, entry))
            })
            .collect();

        let noon = date
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| AgentError::InvalidResponse(format!("bad date {}", date)))?;
        let (_, midday) = day
            .iter()
            .min_by_key(|(time, _)| (*time - noon).num_seconds().abs())
            .ok_or_else(|| AgentError::Weather(format!("no forecast entries for {}", date)))?;

        let temp_min = day
            .iter()
            .map(|(_, e)| e.main.temp_min.unwrap_or(e.main.temp))
            .fold(f64::INFINITY, f64::min);
        let temp_max = day
            .iter()
            .map(|(_, e)| e.main.temp_max.unwrap_or(e.main.temp))
            .fold(f64::NEG_INFINITY, f64::max);
        let rain_chance = day
            .iter()
            .filter_map(|(_, e)| e.pop)
            .reduce(f64::max)
            .map(|p| (p.clamp(0.0, 1.0) * 100.0).round() as u8);

        Ok(WeatherReport {
            location: self.city.name.clone(),
            date: Some(date),
            description: first_description(&midday.weather),
            temperature: midday.main.temp,
            temp_min: Some(temp_min),
            temp_max: Some(temp_max),
            humidity: midday.main.humidity,
            rain_chance,
            unit_symbol: unit_symbol.to_string(),
        })
    }
}
