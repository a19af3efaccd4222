//! Eventing wrapper - emits a typed event after each successful operation
//!
//! Wraps any backend and passes one event per completed call to a single
//! injected handler. Emission is strictly post-success: a failing inner call
//! produces no event and the failure propagates unchanged. The handler is
//! awaited before the wrapper returns, so event order always matches
//! operation order. Fan-out to multiple consumers belongs inside the
//! handler, not here.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::trace;

use crate::backend::{FileMetadata, VfsBackend};

/// One completed contract operation
///
/// Closed set: consumers can match exhaustively. Each variant carries only
/// the path, plus a destination for copy/move and an outcome flag for
/// existence checks and directory creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    FileExistenceChecked { path: String, exists: bool },
    FileWritten { path: String },
    FileAppended { path: String },
    FileRead { path: String },
    FileDeleted { path: String },
    FileCopied { path: String, destination: String },
    FileMoved { path: String, destination: String },
    DirectoryExistenceChecked { path: String, exists: bool },
    DirectoryCreated { path: String, exists: bool },
    DirectoryDeleted { path: String },
    FilesListed { path: String },
    DirectoriesListed { path: String },
}

impl fmt::Display for FsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileExistenceChecked { path, exists } => {
                write!(f, "file existence checked '{path}' ({exists})")
            }
            Self::FileWritten { path } => write!(f, "file written '{path}'"),
            Self::FileAppended { path } => write!(f, "file appended '{path}'"),
            Self::FileRead { path } => write!(f, "file read '{path}'"),
            Self::FileDeleted { path } => write!(f, "file deleted '{path}'"),
            Self::FileCopied { path, destination } => {
                write!(f, "file copied from '{path}' to '{destination}'")
            }
            Self::FileMoved { path, destination } => {
                write!(f, "file moved from '{path}' to '{destination}'")
            }
            Self::DirectoryExistenceChecked { path, exists } => {
                write!(f, "directory existence checked '{path}' ({exists})")
            }
            Self::DirectoryCreated { path, .. } => write!(f, "directory created '{path}'"),
            Self::DirectoryDeleted { path } => write!(f, "directory deleted '{path}'"),
            Self::FilesListed { path } => write!(f, "directory files listed '{path}'"),
            Self::DirectoriesListed { path } => {
                write!(f, "directory directories listed '{path}'")
            }
        }
    }
}

/// Async event handler; its completion gates the wrapper's return
pub type EventHandler = Arc<dyn Fn(FsEvent) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Eventing decorator over any backend
pub struct EventingFs {
    inner: Arc<dyn VfsBackend>,
    handler: EventHandler,
}

impl EventingFs {
    pub fn new(inner: Arc<dyn VfsBackend>, handler: EventHandler) -> Self {
        Self { inner, handler }
    }

    async fn emit(&self, event: FsEvent) -> Result<()> {
        trace!(event = %event, "emitting filesystem event");
        (self.handler)(event).await
    }
}

#[async_trait]
impl VfsBackend for EventingFs {
    async fn file_exists(&self, path: &str) -> Result<bool> {
        let exists = self.inner.file_exists(path).await?;
        self.emit(FsEvent::FileExistenceChecked {
            path: path.to_string(),
            exists,
        })
        .await?;
        Ok(exists)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.inner.write_file(path, data).await?;
        self.emit(FsEvent::FileWritten {
            path: path.to_string(),
        })
        .await
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.inner.append_file(path, data).await?;
        self.emit(FsEvent::FileAppended {
            path: path.to_string(),
        })
        .await
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = self.inner.read_file(path).await?;
        self.emit(FsEvent::FileRead {
            path: path.to_string(),
        })
        .await?;
        Ok(data)
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.inner.delete_file(path).await?;
        self.emit(FsEvent::FileDeleted {
            path: path.to_string(),
        })
        .await
    }

    // Metadata operations are outside the event set; forward untouched

    async fn read_metadata(&self, path: &str) -> Result<FileMetadata> {
        self.inner.read_metadata(path).await
    }

    async fn write_metadata(&self, path: &str, metadata: FileMetadata) -> Result<()> {
        self.inner.write_metadata(path, metadata).await
    }

    async fn copy_file(&self, source: &str, destination: &str) -> Result<()> {
        self.inner.copy_file(source, destination).await?;
        self.emit(FsEvent::FileCopied {
            path: source.to_string(),
            destination: destination.to_string(),
        })
        .await
    }

    async fn move_file(&self, source: &str, destination: &str) -> Result<()> {
        self.inner.move_file(source, destination).await?;
        self.emit(FsEvent::FileMoved {
            path: source.to_string(),
            destination: destination.to_string(),
        })
        .await
    }

    async fn directory_exists(&self, path: &str) -> Result<bool> {
        let exists = self.inner.directory_exists(path).await?;
        self.emit(FsEvent::DirectoryExistenceChecked {
            path: path.to_string(),
            exists,
        })
        .await?;
        Ok(exists)
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        self.inner.create_dir(path).await?;
        // Post-condition of a successful create: the directory exists
        self.emit(FsEvent::DirectoryCreated {
            path: path.to_string(),
            exists: true,
        })
        .await
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let files = self.inner.list_files(path).await?;
        self.emit(FsEvent::FilesListed {
            path: path.to_string(),
        })
        .await?;
        Ok(files)
    }

    async fn list_dirs(&self, path: &str) -> Result<Vec<String>> {
        let dirs = self.inner.list_dirs(path).await?;
        self.emit(FsEvent::DirectoriesListed {
            path: path.to_string(),
        })
        .await?;
        Ok(dirs)
    }

    async fn delete_dir(&self, path: &str) -> Result<()> {
        self.inner.delete_dir(path).await?;
        self.emit(FsEvent::DirectoryDeleted {
            path: path.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFs;
    use std::sync::Mutex;

    /// Wrapper plus a shared log of every event the handler saw
    fn recording_fs() -> (EventingFs, Arc<Mutex<Vec<FsEvent>>>) {
        let seen: Arc<Mutex<Vec<FsEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let handler: EventHandler = Arc::new(move |event| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(event);
                Ok(())
            })
        });
        (EventingFs::new(Arc::new(MemoryFs::new()), handler), seen)
    }

    fn drain(seen: &Arc<Mutex<Vec<FsEvent>>>) -> Vec<FsEvent> {
        std::mem::take(&mut *seen.lock().unwrap())
    }

    #[tokio::test]
    async fn test_one_event_per_successful_write() {
        let (fs, seen) = recording_fs();

        fs.create_dir("d").await.unwrap();
        drain(&seen);

        fs.write_file("d/f.txt", b"data").await.unwrap();
        assert_eq!(
            drain(&seen),
            vec![FsEvent::FileWritten {
                path: "d/f.txt".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_operation_emits_nothing() {
        let (fs, seen) = recording_fs();

        assert!(fs.write_file("nodir/f.txt", b"data").await.is_err());
        assert!(drain(&seen).is_empty());

        assert!(fs.read_file("absent.txt").await.is_err());
        assert!(drain(&seen).is_empty());
    }

    #[tokio::test]
    async fn test_event_kinds_and_order() {
        let (fs, seen) = recording_fs();

        fs.create_dir("d").await.unwrap();
        fs.write_file("d/a.txt", b"A").await.unwrap();
        fs.append_file("d/a.txt", b"B").await.unwrap();
        fs.read_file("d/a.txt").await.unwrap();
        fs.copy_file("d/a.txt", "d/b.txt").await.unwrap();
        fs.move_file("d/b.txt", "d/c.txt").await.unwrap();
        fs.file_exists("d/a.txt").await.unwrap();
        fs.directory_exists("d").await.unwrap();
        fs.list_files("d").await.unwrap();
        fs.list_dirs("d").await.unwrap();
        fs.delete_file("d/c.txt").await.unwrap();
        fs.delete_dir("d").await.unwrap();

        let d = "d".to_string();
        assert_eq!(
            drain(&seen),
            vec![
                FsEvent::DirectoryCreated {
                    path: d.clone(),
                    exists: true
                },
                FsEvent::FileWritten {
                    path: "d/a.txt".to_string()
                },
                FsEvent::FileAppended {
                    path: "d/a.txt".to_string()
                },
                FsEvent::FileRead {
                    path: "d/a.txt".to_string()
                },
                FsEvent::FileCopied {
                    path: "d/a.txt".to_string(),
                    destination: "d/b.txt".to_string()
                },
                FsEvent::FileMoved {
                    path: "d/b.txt".to_string(),
                    destination: "d/c.txt".to_string()
                },
                FsEvent::FileExistenceChecked {
                    path: "d/a.txt".to_string(),
                    exists: true
                },
                FsEvent::DirectoryExistenceChecked {
                    path: d.clone(),
                    exists: true
                },
                FsEvent::FilesListed { path: d.clone() },
                FsEvent::DirectoriesListed { path: d.clone() },
                FsEvent::FileDeleted {
                    path: "d/c.txt".to_string()
                },
                FsEvent::DirectoryDeleted { path: d },
            ]
        );
    }

    #[tokio::test]
    async fn test_metadata_operations_stay_silent() {
        let (fs, seen) = recording_fs();

        fs.write_file("f.txt", b"data").await.unwrap();
        drain(&seen);

        let meta = fs.read_metadata("f.txt").await.unwrap();
        fs.write_metadata("f.txt", meta).await.unwrap();
        assert!(drain(&seen).is_empty());
    }

    #[tokio::test]
    async fn test_handler_failure_propagates_after_commit() {
        let handler: EventHandler =
            Arc::new(|_| Box::pin(async { Err(anyhow::anyhow!("handler refused")) }));
        let inner = Arc::new(MemoryFs::new());
        let fs = EventingFs::new(inner.clone(), handler);

        let err = fs.write_file("f.txt", b"data").await.unwrap_err();
        assert_eq!(err.to_string(), "handler refused");

        // The inner operation had already committed
        assert!(inner.file_exists("f.txt").await.unwrap());
    }

    #[test]
    fn test_display_renders_sentences() {
        let event = FsEvent::FileCopied {
            path: "a.txt".to_string(),
            destination: "b.txt".to_string(),
        };
        assert_eq!(event.to_string(), "file copied from 'a.txt' to 'b.txt'");

        let event = FsEvent::FileWritten {
            path: "a.txt".to_string(),
        };
        assert_eq!(event.to_string(), "file written 'a.txt'");
    }
}
