//! Pass-through decorator base
//!
//! Forwards every contract operation to an inner backend and returns the
//! result unchanged. Cross-cutting wrappers hold an inner trait object the
//! same way and forward the operations they do not augment; see
//! [`EventingFs`](crate::eventing::EventingFs) for a wrapper built on this
//! shape. Errors are never caught or rewrapped, so a stacked chain surfaces
//! the identical error kind a direct call would.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::{FileMetadata, VfsBackend};

/// Forwarding implementation of the contract over an inner backend
pub struct PassthroughFs {
    inner: Arc<dyn VfsBackend>,
}

impl PassthroughFs {
    pub fn new(inner: Arc<dyn VfsBackend>) -> Self {
        Self { inner }
    }

    /// The wrapped backend
    pub fn inner(&self) -> &Arc<dyn VfsBackend> {
        &self.inner
    }
}

#[async_trait]
impl VfsBackend for PassthroughFs {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        self.inner.file_exists(path).await
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.inner.write_file(path, data).await
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.inner.append_file(path, data).await
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.inner.read_file(path).await
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.inner.delete_file(path).await
    }

    async fn read_metadata(&self, path: &str) -> Result<FileMetadata> {
        self.inner.read_metadata(path).await
    }

    async fn write_metadata(&self, path: &str, metadata: FileMetadata) -> Result<()> {
        self.inner.write_metadata(path, metadata).await
    }

    async fn copy_file(&self, source: &str, destination: &str) -> Result<()> {
        self.inner.copy_file(source, destination).await
    }

    async fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        self.inner.move_file(source, destination).await
    }

    async fn directory_exists(&self, path: &str) -> Result<bool> {
        self.inner.directory_exists(path).await
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        self.inner.create_dir(path).await
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        self.inner.list_files(path).await
    }

    async fn list_dirs(&self, path: &str) -> Result<Vec<String>> {
        self.inner.list_dirs(path).await
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        self.inner.delete_dir(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VfsError;
    use crate::memory::MemoryFs;

    #[tokio::test]
    async fn test_forwards_every_operation() {
        let inner = Arc::new(MemoryFs::new());
        let fs = PassthroughFs::new(inner.clone());

        fs.create_dir("d").await.unwrap();
        fs.write_file("d/f.txt", b"one").await.unwrap();
        fs.append_file("d/f.txt", b"two").await.unwrap();

        assert_eq!(fs.read_file("d/f.txt").await.unwrap(), b"onetwo");
        assert!(fs.file_exists("d/f.txt").await.unwrap());
        assert!(fs.directory_exists("d").await.unwrap());

        fs.copy_file("d/f.txt", "d/g.txt").await.unwrap();
        fs.move_file("d/g.txt", "d/h.txt").await.unwrap();
        assert_eq!(fs.list_files("d").await.unwrap(), vec!["d/f.txt", "d/h.txt"]);

        let meta = fs.read_metadata("d/f.txt").await.unwrap();
        fs.write_metadata("d/f.txt", meta).await.unwrap();

        // Effects land on the shared inner backend
        assert!(inner.file_exists("d/h.txt").await.unwrap());

        fs.delete_file("d/h.txt").await.unwrap();
        fs.delete_dir("d").await.unwrap();
        assert!(!inner.directory_exists("d").await.unwrap());
    }

    #[tokio::test]
    async fn test_errors_surface_unchanged() {
        let fs = PassthroughFs::new(Arc::new(MemoryFs::new()));

        let err = fs.read_file("absent.txt").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VfsError>(),
            Some(VfsError::FileNotFound(_))
        ));

        let err = fs.write_file("nodir/f.txt", b"x").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VfsError>(),
            Some(VfsError::DirectoryNotFound(_))
        ));
    }
}
