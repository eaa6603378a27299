use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{validate_key, ObjectMeta, ObjectStore};
use crate::error::{PipelineError, Result};

/// Filesystem-backed object store: one directory per bucket under the data root
pub struct LocalObjectStore {
    bucket: String,
    bucket_root: PathBuf,
}

impl LocalObjectStore {
    pub fn new<P: AsRef<Path>>(data_root: P, bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            bucket_root: data_root.as_ref().join(bucket),
        }
    }

    pub fn bucket_root(&self) -> &Path {
        &self.bucket_root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.bucket_root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<ObjectMeta> {
        let path = self.object_path(key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let meta = ObjectMeta::for_bytes(key, &bytes);
        // Write then rename so readers never see a partial object
        let tmp_path = path.with_extension("partial");
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;

        info!(path = %path.display(), size = meta.size, "Stored object");
        Ok(meta)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), size = bytes.len(), "Read object");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PipelineError::ObjectNotFound(self.location(key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.bucket_root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                if path.extension().is_some_and(|ext| ext == "partial") {
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&self.bucket_root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "orders-bucket");

        let key = "raw/year=2025/month=03/day=15/orders_20250315_143000.jsonl";
        let meta = store.put(key, b"{}\n".to_vec()).await.unwrap();
        assert_eq!(meta.size, 3);
        assert!(dir.path().join("orders-bucket").join(key).exists());

        assert_eq!(store.get(key).await.unwrap(), b"{}\n".to_vec());
        assert_eq!(store.list("raw/").await.unwrap(), vec![key.to_string()]);
        assert!(store.list("processed/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_bucket_lists_nothing() {
        let dir = tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "empty");
        assert!(store.list("").await.unwrap().is_empty());
        assert!(matches!(
            store.get("raw/x.jsonl").await,
            Err(PipelineError::ObjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "b");
        assert!(matches!(
            store.put("../outside.jsonl", Vec::new()).await,
            Err(PipelineError::InvalidKey { .. })
        ));
    }
}
