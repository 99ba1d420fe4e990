use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{PhotoStore, check_key};

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{bucket}/{key}`; the public URL is built the
/// same way as for the S3 backend so a static file server (or the S3 gateway
/// in front of the directory) can serve them.
pub struct FilesystemPhotoStore {
    base_path: PathBuf,
    bucket: String,
    base_url: String,
}

impl FilesystemPhotoStore {
    /// Create a new filesystem store, creating the bucket directory.
    pub async fn new(
        base_path: PathBuf,
        bucket: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let bucket = bucket.into();
        check_key(&bucket)?;
        fs::create_dir_all(base_path.join(&bucket)).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            bucket,
            base_url: base_url.into(),
        })
    }

    /// Filesystem path of the object stored under `key`.
    pub fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(&self.bucket).join(key)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl PhotoStore for FilesystemPhotoStore {
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let object_path = self.object_path(key);

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        check_key(key)?;
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.base_url, self.bucket, key)
    }
}
