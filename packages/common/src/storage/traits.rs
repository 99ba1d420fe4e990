use async_trait::async_trait;

use super::error::StorageError;

/// Key-addressed object storage for uploaded photos.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Delete the object under `key`.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    /// Backends that cannot tell the difference return `true`.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Public URL at which the object under `key` is served.
    fn public_url(&self, key: &str) -> String;
}

/// Reject keys that are empty, absolute, or contain `..` segments.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
