use models::FieldErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Text for a transient notification: the backend's own message when it
    /// sent one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Api { message, .. } | ServiceError::NotFound(message) if !message.trim().is_empty() => {
                message.clone()
            }
            ServiceError::Validation(_) => "Please fix the highlighted fields".to_string(),
            _ => fallback.to_string(),
        }
    }
}
