//! Shared application state
//!
//! Holds one configured handler per upload category. Everything here is
//! read-only after startup, so it is shared behind a plain `Arc`.

use crate::upload::{UploadCategory, UploadError, UploadHandler, UploadStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State shared by all request handlers
#[derive(Debug, Clone)]
pub struct AppState {
    upload_root: PathBuf,
    working_photos: UploadHandler,
    gp_letters: UploadHandler,
}

/// Handle passed to axum handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Initialize upload storage and configure both category handlers
    ///
    /// Creates the category directories; an error here is fatal to startup.
    pub fn new(store: &UploadStore) -> Result<Self, UploadError> {
        Ok(Self {
            upload_root: store.root().to_path_buf(),
            working_photos: store.configure(UploadCategory::WorkingPhoto)?,
            gp_letters: store.configure(UploadCategory::GpLetter)?,
        })
    }

    /// Handler bound to `category`
    pub fn handler(&self, category: UploadCategory) -> &UploadHandler {
        match category {
            UploadCategory::WorkingPhoto => &self.working_photos,
            UploadCategory::GpLetter => &self.gp_letters,
        }
    }

    /// Root directory stored files are served from
    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }
}
