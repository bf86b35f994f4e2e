//! Source readers - resolve a source path to the bytes a worker decodes

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Backend trait for fetching the raw contents of a source
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Read the whole source into memory
    async fn read(&self, source: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads sources from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsSourceReader;

impl FsSourceReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SourceReader for FsSourceReader {
    async fn read(&self, source: &Path) -> std::io::Result<Vec<u8>> {
        let bytes = tokio::fs::read(source).await?;
        log::debug!("📖 Read {} bytes from {}", bytes.len(), source.display());
        Ok(bytes)
    }
}

/// In-memory sources keyed by path; unknown paths fail with `NotFound`
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    sources: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the contents of a source
    pub fn insert(&mut self, source: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.sources.insert(source.into(), contents.into());
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(source, contents);
        self
    }
}

#[async_trait]
impl SourceReader for MemorySourceReader {
    async fn read(&self, source: &Path) -> std::io::Result<Vec<u8>> {
        self.sources.get(source).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such source: {}", source.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_fs_reader_reads_whole_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("traffic.json");

        let mut file = tokio::fs::File::create(&file_path).await.unwrap();
        file.write_all(b"{\"proto\":\"TCP\"}\n{\"proto\":\"UDP\"}\n")
            .await
            .unwrap();
        file.flush().await.unwrap();
        drop(file);

        let bytes = FsSourceReader::new().read(&file_path).await.unwrap();
        assert_eq!(bytes, b"{\"proto\":\"TCP\"}\n{\"proto\":\"UDP\"}\n");
    }

    #[tokio::test]
    async fn test_fs_reader_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");

        let err = FsSourceReader::new().read(&missing).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_memory_reader() {
        let reader = MemorySourceReader::new().with_source("a.json", "{}");

        assert_eq!(reader.read(Path::new("a.json")).await.unwrap(), b"{}");
        assert!(reader.read(Path::new("b.json")).await.is_err());
    }
}
