use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Blob storage for uploaded images.
///
/// `put` writes the bytes under `key` and returns the public URL the stored
/// object is served from.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;
}

/// Disk-backed storage under `{data_dir}/uploads`, the self-hosted default.
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    pub fn new(data_dir: &str, public_url: &str) -> Self {
        Self {
            root: PathBuf::from(data_dir).join("uploads"),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        // Keys are server-generated, but reject separators anyway so a bad
        // caller cannot escape the uploads directory.
        if key.contains("..") || key.starts_with('/') {
            return Err(anyhow!("invalid storage key: {key}"));
        }

        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create upload dir {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        Ok(format!("{}/uploads/{}", self.public_url, key))
    }
}

/// In-memory storage for tests. Remembers nothing but the key it was given.
pub struct MemoryStorage;

#[async_trait::async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, _bytes: &[u8]) -> Result<String> {
        Ok(format!("memory://{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_storage_rejects_path_traversal() {
        let storage = LocalStorage::new("/tmp/fleetboard-test", "http://localhost:3000");
        let result = storage.put("../etc/passwd", b"x").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn local_storage_returns_public_url() {
        let storage = LocalStorage::new("/tmp/fleetboard-test", "http://localhost:3000/");
        let url = storage.put("cars/car_abc.jpg", b"jpegdata").await.expect("put");
        assert_eq!(url, "http://localhost:3000/uploads/cars/car_abc.jpg");
    }
}
