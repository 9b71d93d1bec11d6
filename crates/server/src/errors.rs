use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::FieldErrors;
use serde::Serialize;
use service::notify::Notification;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body of the front server.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: ErrorPayload,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: ErrorPayload { error, message: message.into(), fields: None, notifications: Vec::new() },
        }
    }

    /// Attach the toasts raised while handling the request.
    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.payload.notifications = notifications;
        self
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => {
                let mut err = ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", fields.to_string());
                err.payload.fields = Some(fields);
                err
            }
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Cancelled(msg) => ApiError::new(StatusCode::BAD_REQUEST, "Not Confirmed", msg),
            // 后端的 4xx 原样透传，其余一律 502
            ServiceError::Api { status, message } => match StatusCode::from_u16(status) {
                Ok(code) if code.is_client_error() => ApiError::new(code, "Backend Rejected", message),
                _ => ApiError::new(StatusCode::BAD_GATEWAY, "Backend Error", message),
            },
            ServiceError::Network(msg) | ServiceError::Parse(msg) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "Backend Unavailable", msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.payload.message, "request failed");
        } else {
            warn!(status = self.status.as_u16(), message = %self.payload.message, "request rejected");
        }
        (self.status, Json(self.payload)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address: {0}")]
    InvalidAddr(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
