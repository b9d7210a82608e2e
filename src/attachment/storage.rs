//! Filesystem attachment storage.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{is_valid_reference, sanitize_extension, Attachment};
use crate::db::AttachmentStore;
use crate::Result;

/// Attachment store backed by a local directory.
///
/// Files are stored in a sharded directory structure:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.png
/// ├── cd/
/// │   └── cd90ab12-3456-7890-abcd-ef1234567890.bin
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct FileAttachmentStore {
    base_path: PathBuf,
}

impl FileAttachmentStore {
    /// Create a new FileAttachmentStore with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a reference to its on-disk path.
    ///
    /// Returns `None` for malformed references.
    pub fn path_of(&self, reference: &str) -> Option<PathBuf> {
        if !is_valid_reference(reference) {
            return None;
        }
        Some(self.base_path.join(&reference[..2]).join(reference))
    }

    fn generate_reference(original_name: Option<&str>) -> String {
        format!("{}.{}", Uuid::new_v4(), sanitize_extension(original_name))
    }

    async fn write_durably(tmp_path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(tmp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for FileAttachmentStore {
    async fn put(&self, content: &[u8], original_name: Option<&str>) -> Result<Attachment> {
        let reference = Self::generate_reference(original_name);
        let shard = self.base_path.join(&reference[..2]);
        let path = shard.join(&reference);
        fs::create_dir_all(&shard).await?;

        // Written under a temporary name and renamed, so the reference never
        // resolves to a partial file.
        let tmp_path = shard.join(format!(".{reference}.tmp"));
        if let Err(e) = Self::write_durably(&tmp_path, content).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                warn!(path = ?tmp_path, error = %cleanup, "Failed to remove partial upload");
            }
            return Err(e.into());
        }
        fs::rename(&tmp_path, &path).await?;

        debug!(reference = %reference, size = content.len(), "Attachment stored");
        Ok(Attachment::new(reference, content.len() as u64))
    }

    async fn get(&self, reference: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_of(reference) else {
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileAttachmentStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileAttachmentStore::new(temp_dir.path().join("uploads")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let (temp_dir, store) = setup();
        assert!(store.base_path().exists());
        assert_eq!(store.base_path(), temp_dir.path().join("uploads"));
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (_temp_dir, store) = setup();
        let content = b"\x89PNG fake image bytes";

        let attachment = store.put(content, Some("cat.png")).await.unwrap();

        assert!(attachment.reference.ends_with(".png"));
        assert_eq!(attachment.size, content.len() as u64);
        assert_eq!(
            store.get(&attachment.reference).await.unwrap().unwrap(),
            content
        );
    }

    #[tokio::test]
    async fn test_put_uses_sharded_path() {
        let (_temp_dir, store) = setup();

        let attachment = store.put(b"data", Some("doc.txt")).await.unwrap();
        let path = store.path_of(&attachment.reference).unwrap();

        assert!(path.exists());
        let shard = path.parent().unwrap().file_name().unwrap().to_str().unwrap();
        assert_eq!(shard, &attachment.reference[..2]);
    }

    #[tokio::test]
    async fn test_put_leaves_no_temp_files() {
        let (_temp_dir, store) = setup();

        let attachment = store.put(b"data", None).await.unwrap();
        let shard = store.path_of(&attachment.reference).unwrap();
        let entries: Vec<_> = std::fs::read_dir(shard.parent().unwrap())
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();

        assert_eq!(entries, vec![attachment.reference.clone()]);
        assert!(attachment.reference.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_put_zero_bytes() {
        let (_temp_dir, store) = setup();

        let attachment = store.put(b"", Some("empty.txt")).await.unwrap();

        assert_eq!(attachment.size, 0);
        assert_eq!(
            store.get(&attachment.reference).await.unwrap(),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn test_references_are_unique() {
        let (_temp_dir, store) = setup();

        let a = store.put(b"same", Some("a.txt")).await.unwrap();
        let b = store.put(b"same", Some("a.txt")).await.unwrap();

        assert_ne!(a.reference, b.reference);
    }

    #[tokio::test]
    async fn test_get_unknown_reference() {
        let (_temp_dir, store) = setup();
        let reference = format!("{}.png", Uuid::new_v4());

        assert!(store.get(&reference).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_rejects_traversal() {
        let (temp_dir, store) = setup();
        std::fs::write(temp_dir.path().join("secret.txt"), b"secret").unwrap();

        assert!(store.get("../secret.txt").await.unwrap().is_none());
        assert!(store.path_of("../secret.txt").is_none());
        assert!(store.path_of("/etc/passwd").is_none());
    }

    #[tokio::test]
    async fn test_put_fails_when_storage_is_unwritable() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("uploads");
        let store = FileAttachmentStore::new(&base).unwrap();

        // Replace the storage directory with a plain file.
        std::fs::remove_dir_all(&base).unwrap();
        std::fs::write(&base, b"not a directory").unwrap();

        assert!(store.put(b"data", Some("a.txt")).await.is_err());
    }
}
