//! OpenWeather and OpenRouter clients against local stub servers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::{json, Value};

use ruby_agent::{
    AgentError, ChatBackend, OpenRouterBackend, OpenRouterConfig, OpenWeatherClient,
    OpenWeatherConfig, WeatherProvider, WeatherRequest,
};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn current(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    seen.lock().push(params.clone());
    if params.get("q").map(String::as_str) == Some("Atlantis") {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "name": "Da Nang",
        "main": { "temp": 29.6, "temp_min": 28.0, "temp_max": 31.0, "humidity": 74 },
        "weather": [{ "description": "mây cụm" }]
    })))
}

async fn forecast(Query(_params): Query<HashMap<String, String>>) -> Json<Value> {
    // UTC+7: 2025-06-11 at 09:00 and 12:00 local
    Json(json!({
        "city": { "name": "Hanoi", "timezone": 25200 },
        "list": [
            {
                "dt": 1749607200,
                "main": { "temp": 30.0, "temp_min": 29.0, "temp_max": 30.5, "humidity": 80 },
                "weather": [{ "description": "mưa nhẹ" }],
                "pop": 0.8
            },
            {
                "dt": 1749618000,
                "main": { "temp": 33.0, "temp_min": 32.0, "temp_max": 34.0, "humidity": 60 },
                "weather": [{ "description": "mây đen u ám" }],
                "pop": 0.3
            }
        ]
    }))
}

async fn weather_stub() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/weather", get(current))
        .route("/forecast", get(forecast))
        .with_state(seen.clone());
    (spawn(app).await, seen)
}

fn weather_client(endpoint: &str) -> OpenWeatherClient {
    OpenWeatherClient::new(
        OpenWeatherConfig::default()
            .with_endpoint(endpoint)
            .with_api_key("test-key"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_current_weather_request() {
    let (endpoint, seen) = weather_stub().await;
    let client = weather_client(&endpoint);

    let report = client
        .fetch(&WeatherRequest::Current {
            city: "Da Nang,VN".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(report.location, "Da Nang");
    assert_eq!(report.description, "mây cụm");
    assert_eq!(report.humidity, Some(74));
    assert_eq!(
        report.describe("Đà Nẵng"),
        "Thời tiết Đà Nẵng hiện tại: mây cụm, nhiệt độ 30°C, độ ẩm 74%."
    );

    let params = seen.lock()[0].clone();
    assert_eq!(params["q"], "Da Nang,VN");
    assert_eq!(params["appid"], "test-key");
    assert_eq!(params["units"], "metric");
    assert_eq!(params["lang"], "vi");
}

#[tokio::test]
async fn test_forecast_request() {
    let (endpoint, _) = weather_stub().await;
    let client = weather_client(&endpoint);

    let report = client
        .fetch(&WeatherRequest::Forecast {
            city: "Hanoi,VN".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(report.description, "mây đen u ám");
    assert_eq!(report.temp_min, Some(29.0));
    assert_eq!(report.temp_max, Some(34.0));
    assert_eq!(report.rain_chance, Some(80));
}

#[tokio::test]
async fn test_unknown_city() {
    let (endpoint, _) = weather_stub().await;
    let client = weather_client(&endpoint);

    let err = client
        .fetch(&WeatherRequest::Current {
            city: "Atlantis".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::UnknownCity(ref city) if city == "Atlantis"));
    assert!(err.user_message().contains("Atlantis"));
}

#[tokio::test]
async fn test_missing_weather_key_skips_request() {
    let (endpoint, seen) = weather_stub().await;
    let mut config = OpenWeatherConfig::default().with_endpoint(&endpoint);
    config.api_key = None;
    let client = OpenWeatherClient::new(config).unwrap();

    let err = client
        .fetch(&WeatherRequest::Current {
            city: "Hue,VN".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Configuration(_)));
    assert!(seen.lock().is_empty());
}

async fn completions(
    State(seen): State<Arc<Mutex<Vec<Value>>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer chat-key") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    seen.lock().push(body);
    Ok(Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": "  Xin chào, mình là Ruby.  " } }]
    })))
}

#[tokio::test]
async fn test_chat_completion() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(seen.clone());
    let endpoint = spawn(app).await;

    let config = OpenRouterConfig::default()
        .with_endpoint(&endpoint)
        .with_api_key("chat-key");
    let backend = OpenRouterBackend::new(config).unwrap();
    let reply = backend.reply("xin chào").await.unwrap();
    assert_eq!(reply, "Xin chào, mình là Ruby.");

    let body = seen.lock()[0].clone();
    assert_eq!(body["model"], "openai/gpt-3.5-turbo");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "xin chào");
}

#[tokio::test]
async fn test_chat_http_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(seen);
    let endpoint = spawn(app).await;

    let config = OpenRouterConfig::default()
        .with_endpoint(&endpoint)
        .with_api_key("wrong");
    let backend = OpenRouterBackend::new(config).unwrap();
    let err = backend.reply("xin chào").await.unwrap_err();

    assert!(matches!(err, AgentError::Chat(ref msg) if msg.starts_with("HTTP 401")));
}
