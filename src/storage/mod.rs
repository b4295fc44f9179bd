//! Filesystem blob store for uploaded documents.
//!
//! Blobs live under a configured root in `YYYY/MM` subdirectories with
//! uuid-based names; the database keeps the root-relative path. Blob
//! writes and deletes are not transactional with the owning row.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

#[derive(Clone)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes a blob and returns its root-relative stored path.
    pub async fn save(&self, original_filename: &str, bytes: &[u8]) -> Result<String> {
        let subdir = chrono::Utc::now().format("%Y/%m").to_string();
        let name = match extension_of(original_filename) {
            Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4()),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let stored = format!("{subdir}/{name}");

        let full = self.root.join(&stored);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full, bytes).await?;

        debug!("Stored {} ({} bytes) as {}", original_filename, bytes.len(), stored);
        Ok(stored)
    }

    pub async fn read(&self, stored_path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(stored_path)?;
        Ok(fs::read(&full).await?)
    }

    /// Removes a blob. Missing files are not an error: the row may outlive
    /// the blob after a crash between delete and insert.
    pub async fn delete(&self, stored_path: &str) -> Result<()> {
        let full = self.resolve(stored_path)?;
        match fs::remove_file(&full).await {
            Ok(()) => {
                info!("Deleted blob {}", stored_path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn size(&self, stored_path: &str) -> Result<u64> {
        let full = self.resolve(stored_path)?;
        Ok(fs::metadata(&full).await?.len())
    }

    /// Joins a stored path onto the root, rejecting traversal components.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf> {
        let rel = Path::new(stored_path);
        if rel.components().any(|c| !matches!(c, Component::Normal(_))) {
            anyhow::bail!("Invalid stored path: {stored_path}");
        }
        Ok(self.root.join(rel))
    }
}

/// Lowercased extension of a filename, if it has one.
#[must_use]
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("scan.PDF"), Some("pdf".to_string()));
        assert_eq!(extension_of("photo.front.jpeg"), Some("jpeg".to_string()));
        assert_eq!(extension_of("no_extension"), None);
    }

    #[tokio::test]
    async fn test_save_read_delete_round_trip() {
        let root = std::env::temp_dir().join(format!("vettra-storage-{}", uuid::Uuid::new_v4()));
        let storage = DocumentStorage::new(&root);

        let stored = storage.save("cert.pdf", b"%PDF-fake").await.unwrap();
        assert!(stored.ends_with(".pdf"));
        assert_eq!(storage.read(&stored).await.unwrap(), b"%PDF-fake");
        assert_eq!(storage.size(&stored).await.unwrap(), 9);

        storage.delete(&stored).await.unwrap();
        assert!(storage.read(&stored).await.is_err());
        // Deleting again is a no-op.
        storage.delete(&stored).await.unwrap();

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let storage = DocumentStorage::new("/tmp/vettra-storage-none");
        assert!(storage.read("../etc/passwd").await.is_err());
        assert!(storage.delete("/etc/passwd").await.is_err());
    }
}
