//! Local file storage for uploaded media.
//!
//! Files live flat in one directory that the router serves at `/uploads`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use recettes_core::media::{local_upload_name, public_url, variant_filenames};

/// Upload directory plus the public URL prefix its files are served under.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: PathBuf, public_base_url: String) -> Self {
        Self {
            dir,
            public_base_url,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` to `<dir>/<filename>`, creating the directory on demand.
    pub async fn save(&self, filename: &str, data: &[u8]) -> std::io::Result<()> {
        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(filename), data).await
    }

    /// `<PUBLIC_BASE_URL>/uploads/<filename>`.
    pub fn public_url(&self, filename: &str) -> String {
        public_url(&self.public_base_url, filename)
    }

    /// Best-effort removal of the local files a recipe points at.
    ///
    /// Only URLs containing `/uploads/` with a plain file name are touched.
    /// The image's generated variants go with it. Failures are logged.
    pub async fn remove_recipe_media(&self, image_url: Option<&str>, video_url: Option<&str>) {
        if let Some(name) = image_url.and_then(local_upload_name) {
            self.remove(name, true).await;
            for variant in variant_filenames(name) {
                self.remove(&variant, false).await;
            }
        }
        if let Some(name) = video_url.and_then(local_upload_name) {
            self.remove(name, true).await;
        }
    }

    async fn remove(&self, filename: &str, warn_if_missing: bool) {
        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => tracing::debug!(file = %filename, "Removed upload"),
            Err(e) if e.kind() == ErrorKind::NotFound && !warn_if_missing => {}
            Err(e) => tracing::warn!(file = %filename, error = %e, "Failed to remove upload"),
        }
    }
}
