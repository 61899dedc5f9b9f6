//! Payment screenshot storage
//!
//! Uploaded files are written under the configured directory with a
//! generated name; the stored path is what registrations record.

use std::path::PathBuf;
use tracing::info;
use crate::config::settings::UploadConfig;
use crate::utils::errors::{HackPortalError, Result};
use crate::utils::helpers::generate_uuid;

/// A file received from a client, held in memory until stored
#[derive(Debug, Clone, Default)]
pub struct ScreenshotUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    directory: PathBuf,
    max_file_bytes: usize,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            max_file_bytes: config.max_file_bytes,
        }
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Reject uploads that are empty, too large or not images
    pub fn check(&self, upload: &ScreenshotUpload) -> Result<()> {
        if upload.bytes.is_empty() {
            return Err(HackPortalError::InvalidInput("No file uploaded".to_string()));
        }
        if upload.bytes.len() > self.max_file_bytes {
            return Err(HackPortalError::InvalidInput(format!(
                "Screenshot exceeds the {} byte limit",
                self.max_file_bytes
            )));
        }
        if let Some(content_type) = upload.content_type.as_deref() {
            if !content_type.starts_with("image/") {
                return Err(HackPortalError::InvalidInput("Screenshot must be an image".to_string()));
            }
        }
        Ok(())
    }

    /// Write the file and return its stored path
    pub async fn save(&self, upload: &ScreenshotUpload) -> Result<String> {
        self.check(upload)?;

        let name = format!("{}.{}", generate_uuid(), extension(upload.file_name.as_deref()));
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(&name);
        tokio::fs::write(&path, &upload.bytes).await?;

        let stored = path.to_string_lossy().replace('\\', "/");
        info!(path = %stored, bytes = upload.bytes.len(), "Stored payment screenshot");
        Ok(stored)
    }
}

fn extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn store(dir: &std::path::Path, max: usize) -> UploadStore {
        UploadStore::new(&UploadConfig {
            directory: dir.to_string_lossy().into_owned(),
            max_file_bytes: max,
        })
    }

    fn png(bytes: &[u8]) -> ScreenshotUpload {
        ScreenshotUpload {
            file_name: Some("Payment.PNG".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 16);

        let stored = store.save(&png(b"\x89PNG")).await.unwrap();
        assert!(stored.ends_with(".png"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_rejects_bad_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 4);

        assert_matches!(store.save(&png(b"")).await, Err(HackPortalError::InvalidInput(m)) if m == "No file uploaded");
        assert_matches!(store.save(&png(b"12345")).await, Err(HackPortalError::InvalidInput(_)));

        let mut text = png(b"hi");
        text.content_type = Some("text/plain".to_string());
        assert_matches!(store.save(&text).await, Err(HackPortalError::InvalidInput(m)) if m == "Screenshot must be an image");
    }

    #[test]
    fn test_extension_is_sanitised() {
        assert_eq!(extension(Some("shot.JPG")), "jpg");
        assert_eq!(extension(Some("../../etc/passwd")), "bin");
        assert_eq!(extension(Some("noext")), "bin");
        assert_eq!(extension(None), "bin");
    }
}
