use thiserror::Error;

/// Contract error kinds shared by every backend
///
/// Operations return `anyhow::Result`; callers that need to branch on the
/// failure kind downcast with `err.downcast_ref::<VfsError>()`. Backends map
/// their native not-found signals onto these two variants so error behavior
/// is identical no matter which backend (or decorator stack) served the call.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("cannot find file '{0}'")]
    FileNotFound(String),

    #[error("unable to find directory '{0}'")]
    DirectoryNotFound(String),
}

impl VfsError {
    pub fn file_not_found(path: impl Into<String>) -> anyhow::Error {
        Self::FileNotFound(path.into()).into()
    }

    pub fn directory_not_found(path: impl Into<String>) -> anyhow::Error {
        Self::DirectoryNotFound(path.into()).into()
    }
}
