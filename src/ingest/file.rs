//! CSV input handle
//!
//! A `CsvFile` carries the metadata an upload would have (name, declared
//! media type, reported size) and reads its bytes lazily, either from disk
//! or from memory.

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use super::errors::{IngestError, IngestResult};

#[derive(Debug, Clone)]
enum Content {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A CSV input awaiting validation or parsing
#[derive(Debug, Clone)]
pub struct CsvFile {
    /// File name as supplied by the caller
    pub name: String,
    /// Declared media type, e.g. `text/csv`
    pub media_type: Option<String>,
    /// Reported size in bytes
    pub size: u64,
    content: Content,
}

impl CsvFile {
    /// Opens a file on disk. Only metadata is read here.
    pub async fn from_path(path: &Path) -> IngestResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| IngestError::Io {
                name: name.clone(),
                source: e,
            })?;

        Ok(Self {
            name,
            media_type: None,
            size: metadata.len(),
            content: Content::Path(path.to_path_buf()),
        })
    }

    /// Wraps an in-memory buffer; the reported size is the buffer length.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            size: bytes.len() as u64,
            content: Content::Memory(bytes),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Overrides the reported size, as an upload header would.
    pub fn with_reported_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Reads at most `limit` bytes from the start of the content.
    ///
    /// The flag is true when more content follows the returned prefix.
    pub async fn read_prefix(&self, limit: usize) -> std::io::Result<(Vec<u8>, bool)> {
        match &self.content {
            Content::Memory(bytes) => {
                let end = bytes.len().min(limit);
                Ok((bytes[..end].to_vec(), bytes.len() > limit))
            }
            Content::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                let mut buf = Vec::with_capacity(limit.saturating_add(1));
                file.take(limit as u64 + 1).read_to_end(&mut buf).await?;
                let truncated = buf.len() > limit;
                buf.truncate(limit);
                Ok((buf, truncated))
            }
        }
    }

    /// Reads the whole content.
    pub async fn read_all(&self) -> IngestResult<Vec<u8>> {
        match &self.content {
            Content::Memory(bytes) => Ok(bytes.clone()),
            Content::Path(path) => tokio::fs::read(path).await.map_err(|e| IngestError::Io {
                name: self.name.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_prefix() {
        let file = CsvFile::from_bytes("a.csv", b"id,x\n1,2\n".to_vec());
        assert_eq!(file.size, 9);

        let (head, truncated) = file.read_prefix(4).await.unwrap();
        assert_eq!(head, b"id,x");
        assert!(truncated);

        let (all, truncated) = file.read_prefix(64).await.unwrap();
        assert_eq!(all.len(), 9);
        assert!(!truncated);
    }

    #[tokio::test]
    async fn test_disk_prefix_and_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("claims.csv");
        std::fs::write(&path, "id,x\n1,2\n3,4\n").unwrap();

        let file = CsvFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "claims.csv");
        assert_eq!(file.size, 14);

        let (head, truncated) = file.read_prefix(9).await.unwrap();
        assert_eq!(head, b"id,x\n1,2\n");
        assert!(truncated);

        let (exact, truncated) = file.read_prefix(14).await.unwrap();
        assert_eq!(exact.len(), 14);
        assert!(!truncated);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = CsvFile::from_path(&temp_dir.path().join("absent.csv"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INGEST_IO");
    }
}
