//! Upload API handlers
//!
//! One endpoint per upload category. Each accepts a multipart body and stores
//! the first file part through the category's configured handler.

use crate::error::AppError;
use crate::state::SharedState;
use crate::upload::{StoredFile, UploadCategory, UploadError, UploadHandler};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

/// Response for a stored upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Stored file metadata
    #[serde(flatten)]
    pub file: StoredFile,
    /// Public URL the file is served from
    pub url: String,
}

/// POST /api/uploads/working-photos - Store a working photo
pub async fn upload_working_photo(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    receive(state.handler(UploadCategory::WorkingPhoto), multipart).await
}

/// POST /api/uploads/gp-letters - Store a GP letter
pub async fn upload_gp_letter(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    receive(state.handler(UploadCategory::GpLetter), multipart).await
}

async fn receive(
    handler: &UploadHandler,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            debug!("Skipping non-file field: {:?}", field.name());
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        return match handler
            .store(&original_name, content_type.as_deref(), field)
            .await
        {
            Ok(file) => {
                let url = format!(
                    "/uploads/{}/{}",
                    handler.category().directory(),
                    file.filename
                );
                Ok((StatusCode::CREATED, Json(UploadResponse { file, url })))
            }
            Err(UploadError::Io(e)) => {
                error!("Failed to store {} upload: {}", handler.category(), e);
                Err(UploadError::Io(e).into())
            }
            Err(e) => {
                warn!(
                    category = %handler.category(),
                    original_name = %original_name,
                    "Upload rejected: {}",
                    e
                );
                Err(e.into())
            }
        };
    }

    Err(UploadError::MissingFile.into())
}
