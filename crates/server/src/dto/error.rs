use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// Handler failure rendered as an [`ErrorDto`] body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub path: &'static str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, path: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            path,
        }
    }

    pub fn not_found(message: impl Into<String>, path: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            path,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDto {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            message: self.message,
            path: self.path.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
