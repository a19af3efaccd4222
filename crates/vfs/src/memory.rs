//! In-memory virtual filesystem backend
//!
//! Simulates a hierarchical store over two flat containers: a content map
//! keyed by path and a set of directory markers. No parent/child graph is
//! materialized; containment is derived by normalized-prefix matching at
//! query time. Data exists only in memory and is lost when the backend is
//! dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::{FileMetadata, VfsBackend};
use crate::error::VfsError;
use crate::path::{ancestors, canonical, display_form, parent_of};

#[derive(Clone, Debug)]
struct FileEntry {
    /// Display path as first written by the caller
    path: String,
    content: Vec<u8>,
    metadata: FileMetadata,
}

impl FileEntry {
    fn new(path: String, content: Vec<u8>) -> Self {
        Self {
            path,
            content,
            metadata: FileMetadata::now(),
        }
    }
}

/// Flat containers behind a single lock so each call mutates atomically
#[derive(Default)]
struct Store {
    /// Canonical path -> file entry; BTreeMap keys keep listings sorted
    files: BTreeMap<String, FileEntry>,
    /// Canonical path -> display path for every known directory
    dirs: BTreeMap<String, String>,
}

/// In-memory filesystem backend
///
/// Path equality is the single rule used everywhere: backslashes normalize
/// to forward slashes, then comparison is case-insensitive. Paths differing
/// only by slash style or case collide to the same entry, and all prefix
/// operations (listing, cascade delete, parent checks) use the same
/// canonical form.
pub struct MemoryFs {
    store: Arc<RwLock<Store>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a new empty in-memory filesystem
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Create with initial directories and file contents
    pub fn with_files(files: Vec<(&str, &[u8])>) -> Self {
        let fs = Self::new();
        {
            let mut store = fs.store.write().expect("fresh lock");
            for (path, content) in files {
                let display = display_form(path);
                if let Some(parent) = parent_of(&display) {
                    for ancestor in ancestors(parent) {
                        store
                            .dirs
                            .entry(canonical(ancestor))
                            .or_insert_with(|| ancestor.to_string());
                    }
                }
                store
                    .files
                    .insert(canonical(&display), FileEntry::new(display, content.to_vec()));
            }
        }
        fs
    }

    /// Clear all files and directory markers in one critical section
    pub fn reset(&self) -> Result<()> {
        let mut store = self.write()?;
        store.files.clear();
        store.dirs.clear();
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Store>> {
        self.store.read().map_err(|_| anyhow::anyhow!("Lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Store>> {
        self.store.write().map_err(|_| anyhow::anyhow!("Lock poisoned"))
    }
}

impl Store {
    /// Directory-precondition check; must run before any mutation so a
    /// failed call leaves the store untouched
    fn ensure_dir(&self, display: &str) -> Result<()> {
        if self.dirs.contains_key(&canonical(display)) {
            Ok(())
        } else {
            Err(VfsError::directory_not_found(display))
        }
    }

    fn ensure_parent(&self, display: &str) -> Result<()> {
        match parent_of(display) {
            Some(parent) => self.ensure_dir(parent),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VfsBackend for MemoryFs {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        let store = self.read()?;
        Ok(store.files.contains_key(&canonical(path)))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let display = display_form(path);
        let mut store = self.write()?;
        store.ensure_parent(&display)?;
        store
            .files
            .insert(canonical(&display), FileEntry::new(display, data.to_vec()));
        Ok(())
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let display = display_form(path);
        let mut store = self.write()?;
        store.ensure_parent(&display)?;

        let key = canonical(&display);
        if let Some(entry) = store.files.get_mut(&key) {
            entry.content.extend_from_slice(data);
            let now = std::time::SystemTime::now();
            entry.metadata.modified = now;
            entry.metadata.accessed = now;
        } else {
            store.files.insert(key, FileEntry::new(display, data.to_vec()));
        }
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let store = self.read()?;
        match store.files.get(&canonical(path)) {
            // Private copy: an in-flight buffer is never touched by later writes
            Some(entry) => Ok(entry.content.clone()),
            None => Err(VfsError::file_not_found(path)),
        }
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let display = display_form(path);
        let mut store = self.write()?;
        store.ensure_parent(&display)?;
        // Removing an absent file is a no-op success
        store.files.remove(&canonical(&display));
        Ok(())
    }

    async fn read_metadata(&self, path: &str) -> Result<FileMetadata> {
        let store = self.read()?;
        match store.files.get(&canonical(path)) {
            Some(entry) => Ok(entry.metadata.clone()),
            None => Err(VfsError::file_not_found(path)),
        }
    }

    async fn write_metadata(&self, path: &str, metadata: FileMetadata) -> Result<()> {
        let mut store = self.write()?;
        match store.files.get_mut(&canonical(path)) {
            Some(entry) => {
                entry.metadata = metadata;
                Ok(())
            }
            None => Err(VfsError::file_not_found(path)),
        }
    }

    async fn copy_file(&self, source: &str, destination: &str) -> Result<()> {
        let display = display_form(destination);
        let mut store = self.write()?;

        // Source check precedes the destination precondition
        let content = match store.files.get(&canonical(source)) {
            Some(entry) => entry.content.clone(),
            None => return Err(VfsError::file_not_found(source)),
        };
        store.ensure_parent(&display)?;

        store
            .files
            .insert(canonical(&display), FileEntry::new(display, content));
        Ok(())
    }

    async fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        let display = display_form(destination);
        let mut store = self.write()?;

        let source_key = canonical(source);
        let content = match store.files.get(&source_key) {
            Some(entry) => entry.content.clone(),
            None => return Err(VfsError::file_not_found(source)),
        };
        store.ensure_parent(&display)?;

        store.files.remove(&source_key);
        store
            .files
            .insert(canonical(&display), FileEntry::new(display, content));
        Ok(())
    }

    async fn directory_exists(&self, path: &str) -> Result<bool> {
        let store = self.read()?;
        Ok(store.dirs.contains_key(&canonical(path)))
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        let display = display_form(path);
        let mut store = self.write()?;
        // Every missing ancestor becomes an explicit marker, so intermediate
        // levels answer directory_exists the way a real filesystem would
        for ancestor in ancestors(&display) {
            store
                .dirs
                .entry(canonical(ancestor))
                .or_insert_with(|| ancestor.to_string());
        }
        Ok(())
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let store = self.read()?;
        let display = display_form(path);
        store.ensure_dir(&display)?;

        let prefix = canonical(&display);
        Ok(store
            .files
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, entry)| entry.path.clone())
            .collect())
    }

    async fn list_dirs(&self, path: &str) -> Result<Vec<String>> {
        let store = self.read()?;
        let display = display_form(path);
        store.ensure_dir(&display)?;

        let prefix = canonical(&display);
        Ok(store
            .dirs
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| **key != prefix)
            .map(|(_, shown)| shown.clone())
            .collect())
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        let display = display_form(path);
        let mut store = self.write()?;
        store.ensure_dir(&display)?;

        // Cascade delete inside one critical section; no caller observes a
        // partially removed subtree
        let prefix = canonical(&display);
        store.dirs.retain(|key, _| !key.starts_with(&prefix));
        store.files.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }
}
