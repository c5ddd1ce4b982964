//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::upload::UploadError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload was rejected or could not be stored
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl AppError {
    /// HTTP status this error translates to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Upload(err) => match err {
                UploadError::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                UploadError::TooLarge { .. } | UploadError::RequestTooLarge { .. } => {
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                UploadError::MissingFile | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
                UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            // Keep filesystem details out of client responses
            AppError::Upload(UploadError::Io(_)) => "Failed to store upload".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
