//! Error types for Location Share

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::notifier::NotifierError;
use crate::store::StoreError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failure outcomes of the location operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input; raised before any side effect
    #[error("Validation error: {0}")]
    Validation(String),

    /// The location store was unreachable, timed out or rejected the call
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The notification sink failed after the record was stored
    #[error("Failed to send to Telegram: {0}")]
    Notification(#[from] NotifierError),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Storage(_) | Error::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Notification(_) => "NOTIFICATION_ERROR",
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::Validation(_) | Error::Notification(_) => self.to_string(),
            Error::Storage(_) => {
                tracing::error!("Storage error: {:?}", self);
                "Location store unavailable".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16(),
            "kind": self.error_code(),
        }));

        (status, body).into_response()
    }
}
