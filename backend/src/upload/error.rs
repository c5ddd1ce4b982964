//! Upload-specific error types
//!
//! Every variant is a per-request failure; none of them take the server down.

use super::category::MAX_REQUEST_BYTES;
use super::UploadCategory;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while accepting or persisting an upload
#[derive(Error, Debug)]
pub enum UploadError {
    /// Declared content type is not accepted by the category's MIME filter
    #[error("{} (got {})", .category.rejection_message(), .content_type)]
    UnsupportedType {
        /// Category the file was submitted to
        category: UploadCategory,
        /// Declared content type, or "unknown" when absent
        content_type: String,
    },

    /// File exceeded the category's size ceiling while streaming
    #[error("File too large: maximum size is {limit} bytes")]
    TooLarge {
        /// Ceiling that was exceeded, in bytes
        limit: u64,
    },

    /// Whole multipart request exceeded the route's body limit
    #[error("Request body too large: maximum size is {limit} bytes")]
    RequestTooLarge {
        /// Body limit that was exceeded, in bytes
        limit: u64,
    },

    /// Request carried no file part
    #[error("No file provided")]
    MissingFile,

    /// Multipart body could not be read
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    /// Filesystem failure (directory creation, write, sync)
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        // Hitting the request body limit surfaces as a multipart read error.
        // The per-file ceiling is only ever reported by the streaming check.
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::RequestTooLarge {
                limit: MAX_REQUEST_BYTES,
            }
        } else {
            UploadError::Multipart(err.body_text())
        }
    }
}
