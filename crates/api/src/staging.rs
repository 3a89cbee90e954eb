//! Transient Image Storage
//!
//! Uploaded images are written to a scratch directory while the request is
//! processed. [`StagedImage::release`] removes the file once the upload is
//! done; if the handler bails out early, `Drop` removes it instead. Neither
//! happens when retention is configured.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Scratch directory for uploaded images
#[derive(Debug, Clone)]
pub struct ImageStaging {
    dir: PathBuf,
    retain: bool,
}

impl ImageStaging {
    pub fn new(dir: impl Into<PathBuf>, retain: bool) -> Self {
        Self {
            dir: dir.into(),
            retain,
        }
    }

    /// Create the directory if it does not exist yet
    pub async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a unique name derived from the client filename
    pub async fn stage(&self, client_name: &str, bytes: &[u8]) -> io::Result<StagedImage> {
        let path = self.dir.join(staged_file_name(client_name));
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }
        debug!("Staged {} bytes at {}", bytes.len(), path.display());

        Ok(StagedImage {
            path,
            retain: self.retain,
            released: false,
        })
    }
}

/// An image on disk for the duration of one upload
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    retain: bool,
    released: bool,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now, off the blocking path
    pub async fn release(mut self) {
        self.released = true;
        if self.retain {
            return;
        }
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed staged image {}", self.path.display()),
            Err(e) => warn!("Could not remove staged image {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if self.retain || self.released {
            return;
        }
        // Error paths only; a single unlink, so the sync call is acceptable here
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged image {}", self.path.display()),
            Err(e) => warn!("Could not remove staged image {}: {}", self.path.display(), e),
        }
    }
}

/// Only the final path component of the client name is kept, and a UUID
/// prefix keeps concurrent uploads of the same name apart.
fn staged_file_name(client_name: &str) -> String {
    let base = Path::new(client_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("upload");

    format!("{}-{}", Uuid::new_v4(), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pothole-staging-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_file_name_strips_directories() {
        let name = staged_file_name("../../etc/passwd");
        assert!(name.ends_with("-passwd"));
        assert!(!name.contains('/'));

        assert!(staged_file_name("").ends_with("-upload"));
        assert!(staged_file_name("..").ends_with("-upload"));
        assert!(staged_file_name("road.jpg").ends_with("-road.jpg"));
    }

    #[test]
    fn test_same_name_does_not_collide() {
        assert_ne!(staged_file_name("a.jpg"), staged_file_name("a.jpg"));
    }

    #[tokio::test]
    async fn test_staged_image_removed_on_drop() {
        let dir = scratch_dir();
        let staging = ImageStaging::new(&dir, false);
        staging.prepare().await.unwrap();

        let staged = staging.stage("road.jpg", b"jpeg bytes").await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.starts_with(&dir));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");

        drop(staged);
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_release_removes_file() {
        let dir = scratch_dir();
        let staging = ImageStaging::new(&dir, false);
        staging.prepare().await.unwrap();

        let staged = staging.stage("road.jpg", b"jpeg bytes").await.unwrap();
        let path = staged.path().to_path_buf();
        staged.release().await;
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_retained_image_survives_release() {
        let dir = scratch_dir();
        let staging = ImageStaging::new(&dir, true);
        staging.prepare().await.unwrap();

        let staged = staging.stage("road.jpg", b"x").await.unwrap();
        let path = staged.path().to_path_buf();
        staged.release().await;
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_retained_image_survives_drop() {
        let dir = scratch_dir();
        let staging = ImageStaging::new(&dir, true);
        staging.prepare().await.unwrap();

        let path = staging.stage("road.jpg", b"x").await.unwrap().path().to_path_buf();
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
