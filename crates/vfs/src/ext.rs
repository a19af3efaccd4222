//! Text and line-oriented convenience operations
//!
//! Pure functions over the backend contract; they hold no state and work
//! identically against any backend or decorator stack.

use anyhow::{Context, Result};

use crate::backend::VfsBackend;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Read a file fully and decode as UTF-8 text
pub async fn read_file_text(fs: &dyn VfsBackend, path: &str) -> Result<String> {
    let bytes = fs.read_file(path).await?;
    String::from_utf8(bytes).with_context(|| format!("file '{path}' is not valid UTF-8"))
}

/// Read a file fully and split into lines
///
/// Both `\n` and `\r\n` are treated as separators; a trailing newline does
/// not produce a trailing empty line, and an empty file yields no lines.
pub async fn read_file_lines(fs: &dyn VfsBackend, path: &str) -> Result<Vec<String>> {
    let text = read_file_text(fs, path).await?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Write UTF-8 text as the entire file content
pub async fn write_file_text(fs: &dyn VfsBackend, path: &str, text: &str) -> Result<()> {
    fs.write_file(path, text.as_bytes()).await
}

/// Append each line followed by the platform line terminator, in order
///
/// With zero lines this is an observable no-op: the backend is not touched
/// at all, so an eventing wrapper sees nothing.
pub async fn append_file_lines<I>(fs: &dyn VfsBackend, path: &str, lines: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut buffer = String::new();
    for line in lines {
        buffer.push_str(line.as_ref());
        buffer.push_str(LINE_ENDING);
    }
    if buffer.is_empty() {
        return Ok(());
    }
    fs.append_file(path, buffer.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::{EventHandler, EventingFs, FsEvent};
    use crate::memory::MemoryFs;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_line_splitting() {
        let fs = MemoryFs::new();
        fs.write_file("mixed.txt", b"a\nb\r\nc").await.unwrap();
        assert_eq!(read_file_lines(&fs, "mixed.txt").await.unwrap(), ["a", "b", "c"]);

        fs.write_file("trailing.txt", b"a\nb\n").await.unwrap();
        assert_eq!(read_file_lines(&fs, "trailing.txt").await.unwrap(), ["a", "b"]);

        fs.write_file("empty.txt", b"").await.unwrap();
        assert!(read_file_lines(&fs, "empty.txt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_roundtrip() {
        let fs = MemoryFs::new();
        write_file_text(&fs, "greeting.txt", "hello text").await.unwrap();
        assert_eq!(read_file_text(&fs, "greeting.txt").await.unwrap(), "hello text");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let fs = MemoryFs::new();
        fs.write_file("bin.dat", &[0xff, 0xfe]).await.unwrap();
        assert!(read_file_text(&fs, "bin.dat").await.is_err());
    }

    #[tokio::test]
    async fn test_append_lines_in_order() {
        let fs = MemoryFs::new();
        append_file_lines(&fs, "log.txt", ["one", "two"]).await.unwrap();
        append_file_lines(&fs, "log.txt", ["three"]).await.unwrap();

        assert_eq!(
            read_file_lines(&fs, "log.txt").await.unwrap(),
            ["one", "two", "three"]
        );
    }

    #[tokio::test]
    async fn test_zero_line_append_never_touches_backend() {
        let seen: Arc<Mutex<Vec<FsEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let handler: EventHandler = Arc::new(move |event| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push(event);
                Ok(())
            })
        });
        let fs = EventingFs::new(Arc::new(MemoryFs::new()), handler);

        let none: [&str; 0] = [];
        append_file_lines(&fs, "log.txt", none).await.unwrap();

        assert!(seen.lock().unwrap().is_empty());
        assert!(!fs.file_exists("log.txt").await.unwrap());
    }
}
