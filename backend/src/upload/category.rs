//! Upload categories and their storage rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size ceiling shared by every category (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Room for text fields and multipart framing alongside one full-size file
pub const FORM_FIELDS_ALLOWANCE_BYTES: u64 = 2 * 1024 * 1024;

/// Whole-request ceiling for upload endpoints
pub const MAX_REQUEST_BYTES: u64 = MAX_UPLOAD_BYTES + FORM_FIELDS_ALLOWANCE_BYTES;

/// A class of file upload with its own storage rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadCategory {
    /// Photos of completed work attached by workers
    WorkingPhoto,
    /// Letters from a general practitioner (image scan or PDF)
    GpLetter,
}

impl UploadCategory {
    /// Every category, in startup initialization order
    pub const ALL: [UploadCategory; 2] = [UploadCategory::WorkingPhoto, UploadCategory::GpLetter];

    /// Destination directory, relative to the upload root
    pub fn directory(&self) -> &'static str {
        match self {
            UploadCategory::WorkingPhoto => "working-photos",
            UploadCategory::GpLetter => "gp-letters",
        }
    }

    /// Prefix of every stored filename in this category
    pub fn prefix(&self) -> &'static str {
        match self {
            UploadCategory::WorkingPhoto => "working",
            UploadCategory::GpLetter => "gp",
        }
    }

    /// Maximum accepted size in bytes
    pub fn size_limit(&self) -> u64 {
        MAX_UPLOAD_BYTES
    }

    /// Whether a declared content type passes this category's MIME filter
    pub fn accepts(&self, content_type: &str) -> bool {
        let is_image = content_type.starts_with("image/");
        match self {
            UploadCategory::WorkingPhoto => is_image,
            UploadCategory::GpLetter => is_image || content_type == "application/pdf",
        }
    }

    /// Message returned when the MIME filter rejects a file
    pub fn rejection_message(&self) -> &'static str {
        match self {
            UploadCategory::WorkingPhoto => "Only image files are allowed",
            UploadCategory::GpLetter => "Only image or PDF files are allowed",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadCategory::WorkingPhoto => write!(f, "working photo"),
            UploadCategory::GpLetter => write!(f, "GP letter"),
        }
    }
}
