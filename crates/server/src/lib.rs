//! Ruby Assistant Server
//!
//! HTTP endpoints for chat, weather, notes, and reminders, plus the
//! background reminder poller.

pub mod http;
pub mod metrics;
pub mod poller;
pub mod request_id;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_latency, record_request};
pub use poller::{fire_due_reminders, spawn_reminder_poller};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use ruby_agent::AgentError;
use ruby_persistence::PersistenceError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Agent(AgentError::ForecastOutOfRange { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Agent(AgentError::UnknownCity(_)) => StatusCode::NOT_FOUND,
            Self::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Persistence(PersistenceError::InvalidData(_)) => StatusCode::BAD_REQUEST,
        }
    }

    /// Label for logs and the `error` field of responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Agent(e) => e.kind(),
            Self::Persistence(_) => "persistence",
        }
    }

    fn reply(&self) -> String {
        match self {
            Self::InvalidRequest(msg) => msg.clone(),
            Self::Persistence(PersistenceError::InvalidData(msg)) => msg.clone(),
            Self::Agent(e) => e.user_message(),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status_code()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        record_error(self.kind());

        let body = serde_json::json!({
            "reply": self.reply(),
            "error": self.kind(),
        });
        (status, Json(body)).into_response()
    }
}
