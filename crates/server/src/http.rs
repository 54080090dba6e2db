//! HTTP Endpoints
//!
//! REST API used by the mobile client.

use axum::{
    extract::{Json, Path, Request, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ruby_agent::AssistantReply;
use ruby_persistence::{Note, Reminder};

use crate::metrics::{metrics_handler, record_latency, record_request};
use crate::request_id::request_id_middleware;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.get_config();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let timeout = Duration::from_secs(config.server.timeout_seconds);

    Router::new()
        .route("/chat", post(chat))
        .route("/weather", post(weather))
        .route("/note", post(create_note).get(list_notes))
        .route("/appointment", get(list_appointments))
        .route("/appointment/:id/notified", post(mark_notified))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = tracing::field::Empty,
                        )
                    }),
                )
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TimeoutLayer::new(timeout))
                .layer(cors_layer),
        )
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - Disabled: permissive (development)
/// - Enabled with no origins: any origin, GET/POST only
/// - Enabled with origins: those origins only
/// - Enabled with only unparsable origins: localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, allowing any origin");
        return cors.allow_origin(Any);
    }

    if parsed_origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, allowing localhost:3000 only");
        return cors.allow_origin(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    cors.allow_origin(parsed_origins)
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

/// Route one utterance through the assistant
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AssistantReply>, ServerError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ServerError::InvalidRequest("Bạn chưa nói gì cả.".to_string()));
    }

    let start = Instant::now();
    tracing::info!(message = %message, "Chat message received");
    let reply = state.assistant.handle(message).await?;

    record_request(reply.intent.as_str());
    record_latency("chat", start.elapsed());
    Ok(Json(reply))
}

/// Weather request; `city` is the device location, used when the message names none
#[derive(Debug, Deserialize)]
struct WeatherQuery {
    #[serde(default)]
    message: String,
    #[serde(default)]
    city: Option<String>,
}

async fn weather(
    State(state): State<AppState>,
    Json(request): Json<WeatherQuery>,
) -> Result<Json<AssistantReply>, ServerError> {
    let start = Instant::now();
    let reply = state
        .assistant
        .weather(&request.message, request.city.as_deref())
        .await?;

    record_request(reply.intent.as_str());
    record_latency("weather", start.elapsed());
    Ok(Json(reply))
}

#[derive(Debug, Deserialize)]
struct NoteRequest {
    #[serde(default)]
    content: String,
}

async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<NoteRequest>,
) -> Result<(StatusCode, Json<Note>), ServerError> {
    let note = state.persistence.notes.create(&request.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ServerError> {
    Ok(Json(state.persistence.notes.list().await?))
}

/// Reminder as listed to the client
#[derive(Debug, Serialize)]
struct AppointmentView {
    id: u64,
    /// `YYYY-MM-DD HH:MM`
    datetime: String,
    description: String,
    notified: bool,
}

impl From<Reminder> for AppointmentView {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            datetime: reminder.remind_at.format("%Y-%m-%d %H:%M").to_string(),
            description: reminder.description,
            notified: reminder.notified,
        }
    }
}

async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentView>>, ServerError> {
    let reminders = state.persistence.reminders.list().await?;
    Ok(Json(reminders.into_iter().map(AppointmentView::from).collect()))
}

async fn mark_notified(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ServerError> {
    if state.persistence.reminders.mark_notified(id).await? {
        Ok((StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))))
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "status": "not found" })),
        ))
    }
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.get_config();
    let has_key = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.is_empty());

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": config.environment,
        "weather_configured": has_key(&config.weather.api_key),
        "chat_configured": has_key(&config.chat.api_key),
        "metrics_enabled": state.metrics.is_some(),
    }))
}
