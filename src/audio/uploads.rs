use crate::error::ApiError;
use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A persisted audio upload
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Generated filename (unique per upload)
    pub filename: String,

    /// Absolute/relative filesystem path of the stored file
    pub path: PathBuf,

    /// URL path under which the file is served back to clients
    pub public_url: String,
}

/// Stores uploaded audio under a single directory with generated names.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("creating upload directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write upload bytes to disk under a fresh timestamped name.
    pub fn save_wav(&self, bytes: &[u8]) -> Result<StoredUpload, ApiError> {
        let filename = format!(
            "audio_{}_{}.wav",
            Utc::now().format("%Y%m%d_%H%M%S"),
            &uuid::Uuid::new_v4().to_string()[..8],
        );
        let path = self.root.join(&filename);

        std::fs::write(&path, bytes).map_err(|e| {
            ApiError::Internal(anyhow::Error::new(e).context("writing audio upload"))
        })?;

        info!("Stored audio upload {} ({} bytes)", filename, bytes.len());
        Ok(StoredUpload {
            public_url: format!("/uploads/audio/{}", filename),
            filename,
            path,
        })
    }

    /// Remove a rejected upload. Failure to delete is logged, not fatal.
    pub fn discard(&self, upload: &StoredUpload) {
        if let Err(e) = std::fs::remove_file(&upload.path) {
            warn!("Failed to remove rejected upload {}: {}", upload.filename, e);
        }
    }
}
