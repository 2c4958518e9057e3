//! Incident photo storage backends.

use async_trait::async_trait;
use domain::{PhotoStore, StoreError, StoreResult, StoredPhoto};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Content-addressed names are hex digests with an optional short extension.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.')
        && !name.starts_with('.')
}

fn public_url(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), name)
}

fn name_from_url<'a>(prefix: &str, url: &'a str) -> StoreResult<&'a str> {
    url.strip_prefix(prefix.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| is_safe_name(name))
        .ok_or_else(|| StoreError::Backend(format!("Not a stored photo url: {}", url)))
}

/// Writes photos to a local directory served as static files.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalPhotoStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
        }
    }

    /// Creates the upload directory if it does not exist.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn store(&self, name: &str, bytes: &[u8]) -> StoreResult<StoredPhoto> {
        if !is_safe_name(name) {
            return Err(StoreError::Backend(format!("Unsafe photo name: {}", name)));
        }

        let path = self.dir.join(name);
        let url = public_url(&self.public_prefix, name);

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            return Ok(StoredPhoto {
                url,
                newly_written: false,
            });
        }

        // Write then rename so a reader never sees a partial file.
        let tmp = self.dir.join(format!("{}.{}.part", name, uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to write photo: {}", e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Backend(format!("Failed to store photo: {}", e)));
        }

        tracing::debug!(photo = %name, size = bytes.len(), "Photo stored");
        Ok(StoredPhoto {
            url,
            newly_written: true,
        })
    }

    async fn remove(&self, url: &str) -> StoreResult<()> {
        let name = name_from_url(&self.public_prefix, url)?;
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Backend(format!("Failed to remove photo: {}", e))),
        }
    }
}

/// Keeps photos in memory. Used by tests.
#[derive(Debug, Default)]
pub struct MemoryPhotoStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
    public_prefix: String,
}

impl MemoryPhotoStore {
    pub fn new(public_prefix: impl Into<String>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            public_prefix: public_prefix.into(),
        }
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }

    pub async fn contains_url(&self, url: &str) -> bool {
        match name_from_url(&self.public_prefix, url) {
            Ok(name) => self.files.read().await.contains_key(name),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn store(&self, name: &str, bytes: &[u8]) -> StoreResult<StoredPhoto> {
        if !is_safe_name(name) {
            return Err(StoreError::Backend(format!("Unsafe photo name: {}", name)));
        }

        let mut files = self.files.write().await;
        let newly_written = !files.contains_key(name);
        if newly_written {
            files.insert(name.to_string(), bytes.to_vec());
        }

        Ok(StoredPhoto {
            url: public_url(&self.public_prefix, name),
            newly_written,
        })
    }

    async fn remove(&self, url: &str) -> StoreResult<()> {
        let name = name_from_url(&self.public_prefix, url)?;
        self.files.write().await.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_names() {
        assert!(is_safe_name("abc123.jpg"));
        assert!(is_safe_name("abc123"));
        assert!(!is_safe_name("../etc/passwd"));
        assert!(!is_safe_name("a/b.jpg"));
        assert!(!is_safe_name(".hidden"));
        assert!(!is_safe_name(""));
    }

    #[test]
    fn test_name_from_url() {
        assert_eq!(name_from_url("/uploads", "/uploads/abc.png").unwrap(), "abc.png");
        assert_eq!(name_from_url("/uploads/", "/uploads/abc.png").unwrap(), "abc.png");
        assert!(name_from_url("/uploads", "/elsewhere/abc.png").is_err());
        assert!(name_from_url("/uploads", "/uploads/../secret").is_err());
    }

    #[tokio::test]
    async fn test_memory_store_dedupes_content() {
        let store = MemoryPhotoStore::new("/uploads");
        let first = store.store("abc.jpg", b"one").await.unwrap();
        assert!(first.newly_written);
        assert_eq!(first.url, "/uploads/abc.jpg");

        let second = store.store("abc.jpg", b"one").await.unwrap();
        assert!(!second.newly_written);
        assert_eq!(store.len().await, 1);

        store.remove(&first.url).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("gm-photos-{}", uuid::Uuid::new_v4()));
        let store = LocalPhotoStore::new(&dir, "/uploads");
        store.ensure_dir().await.unwrap();

        let stored = store.store("deadbeef.png", b"png-bytes").await.unwrap();
        assert!(stored.newly_written);
        assert_eq!(tokio::fs::read(dir.join("deadbeef.png")).await.unwrap(), b"png-bytes");

        let again = store.store("deadbeef.png", b"png-bytes").await.unwrap();
        assert!(!again.newly_written);

        store.remove(&stored.url).await.unwrap();
        assert!(!dir.join("deadbeef.png").exists());
        // Removing twice is fine.
        store.remove(&stored.url).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
