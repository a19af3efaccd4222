use std::time::SystemTime;

use anyhow::Result;
use async_trait::async_trait;

/// File metadata returned by metadata operations
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// File creation time
    pub created: SystemTime,
    /// Last modification time
    pub modified: SystemTime,
    /// Last access time
    pub accessed: SystemTime,
    /// Read-only flag
    pub readonly: bool,
}

impl FileMetadata {
    /// Metadata for a freshly created writable file
    pub fn now() -> Self {
        let now = SystemTime::now();
        Self {
            created: now,
            modified: now,
            accessed: now,
            readonly: false,
        }
    }
}

impl Default for FileMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// VFS backend trait - all file operations go through this
///
/// This trait uses `async_trait` so that backends performing real I/O can
/// suspend, and so backends, decorators, and wrappers are interchangeable
/// behind `Arc<dyn VfsBackend>`. Host code depends only on this operation
/// set, never on a concrete backend type.
///
/// No thread-safety guarantee is made beyond the single-call invariants
/// documented per operation; callers issuing concurrent operations against
/// the same instance must serialize externally.
#[async_trait]
pub trait VfsBackend: Send + Sync {
    /// Check whether a file exists at `path`
    async fn file_exists(&self, path: &str) -> Result<bool>;

    /// Write entire file contents (create or overwrite)
    ///
    /// Fails with `VfsError::DirectoryNotFound` when the parent directory
    /// does not exist. On failure the backend is left unmodified.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Append to the file's current contents (empty if absent)
    ///
    /// Same parent-directory precondition as [`write_file`](Self::write_file).
    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read entire file contents
    ///
    /// Fails with `VfsError::FileNotFound` when absent. The returned buffer
    /// is a private copy; later writes to the same path never mutate it.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete a file; deleting an absent file succeeds as a no-op
    ///
    /// Fails with `VfsError::DirectoryNotFound` when the parent directory
    /// does not exist.
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// Read file metadata; fails with `VfsError::FileNotFound` when absent
    async fn read_metadata(&self, path: &str) -> Result<FileMetadata>;

    /// Replace file metadata; fails with `VfsError::FileNotFound` when absent
    async fn write_metadata(&self, path: &str, metadata: FileMetadata) -> Result<()>;

    /// Copy a file, overwriting the destination if present
    ///
    /// Fails with `VfsError::FileNotFound` when `source` is absent and
    /// `VfsError::DirectoryNotFound` when `destination`'s parent is absent.
    /// The source is left unchanged.
    async fn copy_file(&self, source: &str, destination: &str) -> Result<()>;

    /// Move a file: copy to `destination`, then delete `source`
    ///
    /// Same failure modes as [`copy_file`](Self::copy_file).
    async fn move_file(&self, source: &str, destination: &str) -> Result<()>;

    /// Check whether a directory exists at `path`
    async fn directory_exists(&self, path: &str) -> Result<bool>;

    /// Create a directory and all missing ancestors; idempotent
    async fn create_dir(&self, path: &str) -> Result<()>;

    /// List all file paths under `path`, nested files included, sorted
    ///
    /// Fails with `VfsError::DirectoryNotFound` when `path` is unknown.
    async fn list_files(&self, path: &str) -> Result<Vec<String>>;

    /// List all descendant directory paths under `path`, excluding `path`
    /// itself, sorted
    ///
    /// Fails with `VfsError::DirectoryNotFound` when `path` is unknown.
    async fn list_dirs(&self, path: &str) -> Result<Vec<String>>;

    /// Delete a directory together with every file and directory under it
    ///
    /// Fails with `VfsError::DirectoryNotFound` when `path` is unknown.
    /// The cascade is atomic as observed by callers of this instance.
    async fn delete_dir(&self, path: &str) -> Result<()>;
}
