//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use ruby_agent::{
    Assistant, ChatBackend, OpenRouterBackend, OpenRouterConfig, OpenWeatherClient,
    OpenWeatherConfig, WeatherProvider,
};
use ruby_config::Settings;
use ruby_persistence::PersistenceLayer;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub assistant: Arc<Assistant>,
    pub persistence: PersistenceLayer,
    /// `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Settings, assistant: Assistant, persistence: PersistenceLayer) -> Self {
        Self {
            config: Arc::new(config),
            assistant: Arc::new(assistant),
            persistence,
            metrics: None,
        }
    }

    /// Wire in-memory stores and the HTTP collaborators named in `config`
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let persistence = PersistenceLayer::in_memory();

        let weather: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherClient::new(
            OpenWeatherConfig::from(&config.weather),
        )?);
        let chat: Arc<dyn ChatBackend> =
            Arc::new(OpenRouterBackend::new(OpenRouterConfig::from(&config.chat))?);

        let assistant =
            Assistant::from_settings(&config, persistence.reminders.clone(), weather, chat)?;

        tracing::info!(
            default_city = %config.cities.default_city,
            extra_aliases = config.cities.aliases.len(),
            "Assistant initialized"
        );

        Ok(Self::new(config, assistant, persistence))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn get_config(&self) -> &Settings {
        &self.config
    }
}
