//! Error handling for the bookshelf HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::{Timestamp, Uuid};

use crate::response::{Envelope, Status};

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or inconsistent client input
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error from a plain message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope status: `fail` for client problems, `error` for server ones
    pub fn envelope_status(&self) -> Status {
        match self {
            AppError::Internal(_) => Status::Error,
            _ => Status::Fail,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v7(Timestamp::now(uuid::NoContext));
        let status = self.status_code();
        let envelope_status = self.envelope_status();

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                status_code = %status.as_u16(),
                error = ?self,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                status_code = %status.as_u16(),
                message = %self,
                "request rejected"
            );
        }

        // Internal details stay in the logs for release builds
        let message = if cfg!(not(debug_assertions)) && status.is_server_error() {
            "an internal server error occurred".to_string()
        } else {
            self.to_string()
        };

        let body: Envelope<()> = Envelope {
            status: envelope_status,
            message: Some(message),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}
