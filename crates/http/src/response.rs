//! Uniform JSON envelope returned by every bookshelf endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome class carried in the envelope's `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Request handled
    Success,
    /// Client-input problem
    Fail,
    /// Internal failure
    Error,
}

/// `{ status, message?, data? }` body
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Successful response: an HTTP status plus a `success` envelope
#[derive(Debug)]
pub struct ApiResponse<T> {
    status_code: StatusCode,
    body: Envelope<T>,
}

impl<T> ApiResponse<T> {
    /// 200 response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: Envelope {
                status: Status::Success,
                message: None,
                data: Some(data),
            },
        }
    }

    /// 201 response carrying `data`
    pub fn created(data: T) -> Self {
        Self::ok(data).with_status(StatusCode::CREATED)
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.message = Some(message.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn envelope(&self) -> &Envelope<T> {
        &self.body
    }
}

impl ApiResponse<()> {
    /// 200 response with only a message and no `data`
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: Envelope {
                status: Status::Success,
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}
