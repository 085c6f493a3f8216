//! File system utilities.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Failure while writing a streamed download to disk.
#[derive(Debug, Error)]
pub enum StreamWriteError<E: std::error::Error + 'static> {
    #[error("download interrupted")]
    Source(#[source] E),
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A sibling of `path` unique to this call, so concurrent writers of one
/// target never share a temp file.
fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    parent.join(format!(".{file_name}.{}.{seq}.tmp", std::process::id()))
}

/// Writes content to a file atomically using a temp file and rename.
///
/// This prevents file corruption if the process is interrupted (e.g., Ctrl+C).
/// The temp file is created in the same directory as the target file to ensure
/// the rename operation is atomic (same filesystem).
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)
}

/// Streams chunks into `path` atomically, creating parent directories.
///
/// Returns the number of bytes written. On any failure the temp file is
/// removed and the target is left untouched.
pub async fn atomic_write_stream<S, E>(path: &Path, stream: S) -> Result<u64, StreamWriteError<E>>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::error::Error + 'static,
{
    let io_err = |source| StreamWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let temp_path = temp_path_for(path);
    let result = write_chunks(&temp_path, stream).await;

    match result {
        Ok(written) => {
            tokio::fs::rename(&temp_path, path).await.map_err(io_err)?;
            Ok(written)
        }
        Err(err) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            Err(match err {
                StreamWriteError::Io { source, .. } => io_err(source),
                source => source,
            })
        }
    }
}

async fn write_chunks<S, E>(temp_path: &Path, stream: S) -> Result<u64, StreamWriteError<E>>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: std::error::Error + 'static,
{
    let io_err = |source| StreamWriteError::Io {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(temp_path).await.map_err(io_err)?;
    let mut stream = std::pin::pin!(stream);
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(StreamWriteError::Source)?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_err)?;
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Reset;

    fn chunks(parts: Vec<Result<&'static str, Reset>>) -> impl Stream<Item = Result<Bytes, Reset>> {
        futures_util::stream::iter(
            parts
                .into_iter()
                .map(|part| part.map(|s| Bytes::from_static(s.as_bytes()))),
        )
    }

    #[test]
    fn test_atomic_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"Hello, World!").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "Hello, World!");
    }

    #[test]
    fn test_atomic_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "Original content").unwrap();
        atomic_write(&file_path, b"New content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "New content");
        assert_eq!(entries(&temp_dir), ["test.txt"]);
    }

    #[tokio::test]
    async fn test_atomic_write_stream_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fr-FR").join("nested").join("app.json");

        let written = atomic_write_stream(&file_path, chunks(vec![Ok("{\"a\":"), Ok("1}")]))
            .await
            .unwrap();

        assert_eq!(written, 7);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_atomic_write_stream_failure_keeps_target() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("app.json");
        fs::write(&file_path, "old").unwrap();

        let err = atomic_write_stream(&file_path, chunks(vec![Ok("partial"), Err(Reset)]))
            .await
            .unwrap_err();

        assert!(matches!(err, StreamWriteError::Source(Reset)));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "old");
        assert_eq!(entries(&temp_dir), ["app.json"]);
    }

    #[test]
    fn test_temp_paths_are_unique_per_call() {
        let target = Path::new("out/fr-FR.json");
        let first = temp_path_for(target);
        let second = temp_path_for(target);

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("out")));
        assert!(first.file_name().unwrap().to_string_lossy().starts_with(".fr-FR.json."));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_streams_to_same_target() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fr-FR.json");

        let writers = (0..8).map(|_| {
            let file_path = file_path.clone();
            tokio::spawn(async move {
                atomic_write_stream(&file_path, chunks(vec![Ok("{\"a\":"), Ok("1}")])).await
            })
        });
        for writer in writers.collect::<Vec<_>>() {
            assert_eq!(writer.await.unwrap().unwrap(), 7);
        }

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{\"a\":1}");
        assert_eq!(entries(&temp_dir), ["fr-FR.json"]);
    }

    fn entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
