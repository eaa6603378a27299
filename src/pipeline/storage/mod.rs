//! Object storage for raw and processed order batches.
//!
//! Keys look like S3 keys (`raw/year=2025/month=03/day=15/orders_...jsonl`);
//! backends map them onto whatever they store bytes in.

pub mod local;
pub mod memory;
pub mod partition;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{PipelineError, Result};

pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;
pub use partition::PartitionedKey;

/// Metadata returned after a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    pub key: String,
    pub size: usize,
    /// Hex-encoded SHA-256 of the object body
    pub sha256: String,
}

impl ObjectMeta {
    pub fn for_bytes(key: &str, bytes: &[u8]) -> Self {
        Self {
            key: key.to_string(),
            size: bytes.len(),
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket name used when rendering locations
    fn bucket(&self) -> &str;

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<ObjectMeta>;
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    /// Keys under `prefix`, sorted ascending
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket(), key)
    }
}

/// Reject keys that are empty, absolute or escape the bucket
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = |reason: &str| PipelineError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.trim().is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(invalid("key must be a relative path"));
    }
    if key.ends_with('/') {
        return Err(invalid("key must name an object, not a prefix"));
    }
    if key.split('/').any(|segment| segment == ".." || segment == "." || segment.is_empty()) {
        return Err(invalid("key contains an empty or relative segment"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("raw/year=2025/month=03/day=15/orders_20250315_143000.jsonl").is_ok());
        assert!(validate_key("file.jsonl").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        for key in ["", "  ", "/etc/passwd", "raw/../secret", "raw//x", "raw/", "a\\b", "./x"] {
            assert!(
                matches!(validate_key(key), Err(PipelineError::InvalidKey { .. })),
                "expected '{}' to be rejected",
                key
            );
        }
    }

    #[test]
    fn test_object_meta_digest() {
        let meta = ObjectMeta::for_bytes("k", b"abc");
        assert_eq!(meta.size, 3);
        assert_eq!(
            meta.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
