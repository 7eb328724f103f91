//! Payment proof storage
//!
//! Screenshots are written under the upload root as `<uuid>.<ext>` and
//! referenced from the order as `uploads/<file>`, which is also the path
//! they are served back on.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Default ceiling for a single upload, in bytes
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5_000_000;

/// URL prefix stored uploads are served under
pub const PUBLIC_PREFIX: &str = "uploads";

const ALLOWED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Local directory holding payment screenshots
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Validate a proof without storing it. Returns the lowercase extension.
    pub fn check(&self, file: Option<&UploadedFile>) -> ApiResult<String> {
        let file = file
            .filter(|f| !f.bytes.is_empty())
            .ok_or(ApiError::MissingProof)?;

        if file.bytes.len() > self.max_bytes {
            return Err(ApiError::FileTooLarge);
        }

        let extension = Path::new(&file.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_TYPES.contains(&ext.as_str()))
            .ok_or(ApiError::InvalidFileType)?;

        let content_type_allowed = file
            .content_type
            .as_deref()
            .and_then(|ct| {
                ct.trim()
                    .to_ascii_lowercase()
                    .strip_prefix("image/")
                    .map(str::to_string)
            })
            .is_some_and(|subtype| ALLOWED_TYPES.contains(&subtype.as_str()));

        if !content_type_allowed {
            return Err(ApiError::InvalidFileType);
        }

        Ok(extension)
    }

    /// Validate and write a proof. Returns the stored relative path.
    pub async fn store(&self, file: Option<&UploadedFile>) -> ApiResult<String> {
        let extension = self.check(file)?;
        let file = file.ok_or(ApiError::MissingProof)?;

        self.ensure_root().await.map_err(ApiError::internal)?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.root.join(&name), &file.bytes)
            .await
            .map_err(ApiError::internal)?;

        info!("Stored payment proof {} ({} bytes)", name, file.bytes.len());
        Ok(format!("{}/{}", PUBLIC_PREFIX, name))
    }

    /// Remove a previously stored file. Failures are logged only.
    pub async fn discard(&self, stored_path: &str) {
        let Some(name) = stored_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.contains('/') && !name.contains(".."))
        else {
            warn!("Refusing to discard unexpected path {}", stored_path);
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.root.join(name)).await {
            warn!("Failed to discard {}: {}", stored_path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file(name: &str, content_type: &str, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn missing_or_empty_file_is_missing_proof() {
        let store = UploadStore::new("unused", DEFAULT_MAX_UPLOAD_BYTES);
        assert!(matches!(store.check(None), Err(ApiError::MissingProof)));

        let empty = file("proof.png", "image/png", b"");
        assert!(matches!(store.check(Some(&empty)), Err(ApiError::MissingProof)));
    }

    #[test]
    fn extension_and_content_type_must_both_be_images() {
        let store = UploadStore::new("unused", DEFAULT_MAX_UPLOAD_BYTES);

        let pdf = file("proof.pdf", "image/png", b"data");
        assert!(matches!(store.check(Some(&pdf)), Err(ApiError::InvalidFileType)));

        let disguised = file("proof.png", "application/pdf", b"data");
        assert!(matches!(store.check(Some(&disguised)), Err(ApiError::InvalidFileType)));

        let upper = file("PROOF.JPG", "image/jpeg", b"data");
        assert_eq!(store.check(Some(&upper)).unwrap(), "jpg");
    }

    #[test]
    fn oversized_file_is_rejected() {
        let store = UploadStore::new("unused", 4);
        let big = file("proof.gif", "image/gif", b"12345");
        assert!(matches!(store.check(Some(&big)), Err(ApiError::FileTooLarge)));
    }

    #[tokio::test]
    async fn store_then_discard() {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"), DEFAULT_MAX_UPLOAD_BYTES);

        let stored = store
            .store(Some(&file("proof.png", "image/png", b"png-bytes")))
            .await
            .unwrap();
        assert!(stored.starts_with("uploads/"));
        assert!(stored.ends_with(".png"));

        let on_disk = dir.path().join(&stored);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"png-bytes");

        store.discard(&stored).await;
        assert!(!on_disk.exists());
    }
}
