//! Upload storage on local disk
//!
//! An [`UploadStore`] owns the upload root and makes sure every category
//! directory exists before anything is written. [`UploadHandler`]s are bound
//! to one category and persist a single streamed file per call.

use super::{generate_filename, UploadCategory, UploadError};
use axum::body::Bytes;
use futures_util::{Stream, StreamExt};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Metadata of a successfully persisted upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Category the file was stored under
    pub category: UploadCategory,
    /// Generated filename on disk
    pub filename: String,
    /// Full path of the stored file
    pub path: String,
    /// Filename as supplied by the client
    pub original_name: String,
    /// Declared content type
    pub content_type: String,
    /// Number of bytes written
    pub size: u64,
}

/// Local-disk storage root shared by all upload categories
#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
    ready: OnceCell<()>,
}

impl UploadStore {
    /// Create a store rooted at `root` (directories are not touched yet)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ready: OnceCell::new(),
        }
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory files of `category` are written to
    pub fn category_dir(&self, category: UploadCategory) -> PathBuf {
        self.root.join(category.directory())
    }

    /// Create every category directory, recursively
    ///
    /// Runs once per store; subsequent calls return immediately. A failure here
    /// means the process cannot serve uploads at all.
    pub fn ensure_directories(&self) -> Result<(), UploadError> {
        self.ready.get_or_try_init(|| -> Result<(), UploadError> {
            for category in UploadCategory::ALL {
                let dir = self.category_dir(category);
                // create_dir_all tolerates a concurrent creator
                std::fs::create_dir_all(&dir)?;
                info!("Upload directory ready: {}", dir.display());
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Build the handler for one category
    ///
    /// # Returns
    /// * `Ok(UploadHandler)` - Handler bound to destination, naming, MIME filter and size ceiling
    /// * `Err(UploadError)` - If the category directories could not be created
    pub fn configure(&self, category: UploadCategory) -> Result<UploadHandler, UploadError> {
        self.ensure_directories()?;
        Ok(UploadHandler {
            category,
            destination: self.category_dir(category),
            size_limit: category.size_limit(),
        })
    }
}

/// Per-category upload handler
#[derive(Debug, Clone)]
pub struct UploadHandler {
    category: UploadCategory,
    destination: PathBuf,
    size_limit: u64,
}

impl UploadHandler {
    /// Category this handler stores
    pub fn category(&self) -> UploadCategory {
        self.category
    }

    /// Directory stored files land in
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Size ceiling in bytes
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Apply the category's MIME filter to a declared content type
    pub fn check_mime(&self, content_type: Option<&str>) -> Result<(), UploadError> {
        match content_type {
            Some(ct) if self.category.accepts(ct) => Ok(()),
            other => Err(UploadError::UnsupportedType {
                category: self.category,
                content_type: other.unwrap_or("unknown").to_string(),
            }),
        }
    }

    /// Validate and persist one streamed file
    ///
    /// The MIME filter runs before anything touches the disk. The body is then
    /// written chunk by chunk and aborted as soon as it exceeds the size
    /// ceiling; a partially written file is removed on any failure.
    pub async fn store<S, E>(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        body: S,
    ) -> Result<StoredFile, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        self.check_mime(content_type)?;
        let content_type = content_type.unwrap_or_default().to_string();

        let filename = generate_filename(self.category.prefix(), original_name);
        let path = self.destination.join(&filename);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        match self.write_body(file, body).await {
            Ok(size) => {
                info!(
                    category = %self.category,
                    filename = %filename,
                    size,
                    "Stored upload"
                );
                Ok(StoredFile {
                    category: self.category,
                    filename,
                    path: path.to_string_lossy().to_string(),
                    original_name: original_name.to_string(),
                    content_type,
                    size,
                })
            }
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&path).await {
                    warn!(
                        "Failed to remove partial upload {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn write_body<S, E>(&self, mut file: fs::File, body: S) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<UploadError>,
    {
        tokio::pin!(body);
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(Into::<UploadError>::into)?;
            written += chunk.len() as u64;
            if written > self.size_limit {
                debug!(
                    "Upload exceeded {} bytes after {} bytes",
                    self.size_limit, written
                );
                return Err(UploadError::TooLarge {
                    limit: self.size_limit,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}
