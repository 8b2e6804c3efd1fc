// Scratch directory for transient per-request uploads
//
// Files are named with a random UUID so concurrent requests sharing the
// directory cannot clobber each other. A file never outlives the request
// that created it: the handler calls `ScratchFile::cleanup` on every exit
// path once the remote pipeline has run.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ScratchDir {
    dir: PathBuf,
}

impl ScratchDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the directory if it does not exist. Called once at startup.
    pub fn ensure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write upload bytes under a collision-resistant name
    /// (`<uuid-hex>.<extension>`) and hand back a cleanup handle.
    pub async fn store(&self, extension: &str, bytes: &[u8]) -> AppResult<ScratchFile> {
        let unique_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.dir.join(unique_name);

        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to save upload: {}", e)))?;

        info!(
            "File saved temporarily at: {} ({} bytes)",
            path.display(),
            bytes.len()
        );

        Ok(ScratchFile { path })
    }

    /// Number of entries currently resident in the directory. Non-zero
    /// between requests indicates leaked temporary files.
    pub fn file_count(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

/// A stored upload awaiting deletion. Deletion failures are logged and
/// swallowed; they never surface to the caller.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn cleanup(self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => info!("Temporary file {} removed", self.path.display()),
            Err(e) => warn!(
                "Error removing temporary file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_writes_file_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path());

        let file = scratch.store("png", b"fake image bytes").await.unwrap();

        assert!(file.path().exists());
        assert_eq!(file.path().extension().unwrap(), "png");
        assert_eq!(fs::read(file.path()).await.unwrap(), b"fake image bytes");
    }

    #[tokio::test]
    async fn stored_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path());

        let a = scratch.store("png", b"a").await.unwrap();
        let b = scratch.store("png", b"b").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(scratch.file_count(), 2);
    }

    #[tokio::test]
    async fn cleanup_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path());

        let file = scratch.store("pdf", b"doc").await.unwrap();
        let path = file.path().to_path_buf();
        file.cleanup().await;

        assert!(!path.exists());
        assert_eq!(scratch.file_count(), 0);
    }

    #[tokio::test]
    async fn cleanup_of_missing_file_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::new(dir.path());

        let file = scratch.store("jpg", b"x").await.unwrap();
        fs::remove_file(file.path()).await.unwrap();

        // Must not panic or error even though the file is already gone.
        file.cleanup().await;
    }

    #[test]
    fn file_count_of_missing_dir_is_zero() {
        let scratch = ScratchDir::new("/definitely/not/a/real/dir");
        assert_eq!(scratch.file_count(), 0);
    }
}
