//! Physical filesystem backend - forwards contract operations to `std::fs`
//!
//! All paths are `/`-separated and resolved under a sandbox root. Blocking
//! filesystem work runs inside `tokio::task::spawn_blocking`. Native
//! not-found conditions are translated into the contract error kinds; every
//! other native error propagates untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use async_trait::async_trait;
use filetime::FileTime;
use tracing::debug;

use crate::backend::{FileMetadata, VfsBackend};
use crate::error::VfsError;
use crate::path::{display_form, parent_of};

/// Local filesystem backend rooted at a sandbox directory
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Create new local FS backend with specified root directory
    ///
    /// An unusable root is not fatal here; every subsequent operation will
    /// report it through the normal error kinds.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root_path = root.into();
        // Ensure root exists and canonicalize it
        if let Err(err) = fs::create_dir_all(&root_path) {
            debug!(root = ?root_path, %err, "unable to create sandbox root");
        }
        Self {
            root: root_path.canonicalize().unwrap_or(root_path),
        }
    }

    /// Resolve a VFS path to an absolute filesystem path
    ///
    /// Rejects `..` components so no path can escape the sandbox root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let display = display_form(path);
        if display.split('/').any(|part| part == "..") {
            bail!(
                "Path traversal blocked: {} escapes sandbox {}",
                path,
                self.root.display()
            );
        }
        Ok(self.root.join(display.trim_start_matches('/')))
    }
}

/// Map a native not-found signal to the contract's file kind
fn file_err(err: io::Error, path: &str) -> anyhow::Error {
    if err.kind() == io::ErrorKind::NotFound {
        VfsError::file_not_found(path)
    } else {
        err.into()
    }
}

/// Map a native not-found signal to the contract's directory kind
fn dir_err(err: io::Error, path: &str) -> anyhow::Error {
    if err.kind() == io::ErrorKind::NotFound {
        VfsError::directory_not_found(path)
    } else {
        err.into()
    }
}

/// Directory named by a write/append/delete failure: the target's parent
fn parent_display(path: &str) -> String {
    let display = display_form(path);
    parent_of(&display).unwrap_or(&display).to_string()
}

/// Recursive walk collecting `/`-separated paths in the caller's path space
fn walk(dir: &Path, prefix: &str, files: &mut Vec<String>, dirs: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let child = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if entry.file_type()?.is_dir() {
            dirs.push(child.clone());
            walk(&entry.path(), &child, files, dirs)?;
        } else {
            files.push(child);
        }
    }
    Ok(())
}

#[async_trait]
impl VfsBackend for LocalFs {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        let resolved = self.resolve(path)?;
        tokio::task::spawn_blocking(move || resolved.is_file())
            .await
            .map_err(Into::into)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let resolved = self.resolve(path)?;
        let parent = parent_display(path);
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || {
            fs::write(resolved, data).map_err(|e| dir_err(e, &parent))
        })
        .await?
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let resolved = self.resolve(path)?;
        let parent = parent_display(path);
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || {
            use std::io::Write;
            let mut file = fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(resolved)
                .map_err(|e| dir_err(e, &parent))?;
            file.write_all(&data)?;
            Ok(())
        })
        .await?
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(path)?;
        let shown = path.to_string();
        tokio::task::spawn_blocking(move || fs::read(resolved).map_err(|e| file_err(e, &shown)))
            .await?
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let resolved = self.resolve(path)?;
        let parent = parent_display(path);
        tokio::task::spawn_blocking(move || {
            // The native layer reports a missing file and a missing parent the
            // same way, so check the parent to keep absent-file deletes no-ops
            if let Some(dir) = resolved.parent() {
                if !dir.is_dir() {
                    return Err(VfsError::directory_not_found(parent));
                }
            }
            match fs::remove_file(&resolved) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
        .await?
    }

    async fn read_metadata(&self, path: &str) -> Result<FileMetadata> {
        let resolved = self.resolve(path)?;
        let shown = path.to_string();
        tokio::task::spawn_blocking(move || {
            let meta = fs::metadata(&resolved).map_err(|e| file_err(e, &shown))?;
            let modified = meta.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            Ok(FileMetadata {
                // Not every platform records creation time
                created: meta.created().unwrap_or(modified),
                modified,
                accessed: meta.accessed().unwrap_or(modified),
                readonly: meta.permissions().readonly(),
            })
        })
        .await?
    }

    async fn write_metadata(&self, path: &str, metadata: FileMetadata) -> Result<()> {
        let resolved = self.resolve(path)?;
        let shown = path.to_string();
        tokio::task::spawn_blocking(move || {
            let meta = fs::metadata(&resolved).map_err(|e| file_err(e, &shown))?;
            // Creation time is not settable through the native layer
            filetime::set_file_times(
                &resolved,
                FileTime::from_system_time(metadata.accessed),
                FileTime::from_system_time(metadata.modified),
            )?;
            let mut perms = meta.permissions();
            perms.set_readonly(metadata.readonly);
            fs::set_permissions(&resolved, perms)?;
            Ok(())
        })
        .await?
    }

    async fn copy_file(&self, source: &str, destination: &str) -> Result<()> {
        let src = self.resolve(source)?;
        let dst = self.resolve(destination)?;
        let shown_src = source.to_string();
        let parent = parent_display(destination);
        tokio::task::spawn_blocking(move || {
            if !src.is_file() {
                return Err(VfsError::file_not_found(shown_src));
            }
            fs::copy(&src, &dst).map_err(|e| dir_err(e, &parent))?;
            Ok(())
        })
        .await?
    }

    async fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        let src = self.resolve(source)?;
        let dst = self.resolve(destination)?;
        let shown_src = source.to_string();
        let parent = parent_display(destination);
        tokio::task::spawn_blocking(move || {
            if !src.is_file() {
                return Err(VfsError::file_not_found(shown_src));
            }
            fs::rename(&src, &dst).map_err(|e| dir_err(e, &parent))?;
            Ok(())
        })
        .await?
    }

    async fn directory_exists(&self, path: &str) -> Result<bool> {
        let resolved = self.resolve(path)?;
        tokio::task::spawn_blocking(move || resolved.is_dir())
            .await
            .map_err(Into::into)
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        let resolved = self.resolve(path)?;
        // create_dir_all is idempotent and materializes the whole chain
        tokio::task::spawn_blocking(move || fs::create_dir_all(resolved).map_err(Into::into))
            .await?
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        let display = display_form(path);
        tokio::task::spawn_blocking(move || {
            if !resolved.is_dir() {
                return Err(VfsError::directory_not_found(display));
            }
            let mut files = Vec::new();
            let mut dirs = Vec::new();
            walk(&resolved, &display, &mut files, &mut dirs)?;
            files.sort();
            Ok(files)
        })
        .await?
    }

    async fn list_dirs(&self, path: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        let display = display_form(path);
        tokio::task::spawn_blocking(move || {
            if !resolved.is_dir() {
                return Err(VfsError::directory_not_found(display));
            }
            let mut files = Vec::new();
            let mut dirs = Vec::new();
            walk(&resolved, &display, &mut files, &mut dirs)?;
            dirs.sort();
            Ok(dirs)
        })
        .await?
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        let resolved = self.resolve(path)?;
        let shown = display_form(path);
        debug!(path = %shown, "removing directory tree");
        tokio::task::spawn_blocking(move || {
            fs::remove_dir_all(resolved).map_err(|e| dir_err(e, &shown))
        })
        .await?
    }
}
