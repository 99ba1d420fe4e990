use async_trait::async_trait;
use ::s3::creds::Credentials;
use ::s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::traits::{PhotoStore, check_key};
use crate::config::StorageConfig;

/// S3-compatible object store backed by `rust-s3`.
pub struct S3PhotoStore {
    bucket: Box<Bucket>,
    config: StorageConfig,
}

impl S3PhotoStore {
    /// Build a bucket handle from configuration.
    ///
    /// Credentials come from the config when both keys are set, otherwise
    /// from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Config(format!("invalid region: {e}")))?,
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access.as_str()), Some(secret.as_str()), None, None, None)
            }
            _ => Credentials::from_env(),
        }
        .map_err(|e| StorageError::Config(format!("credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            config: config.clone(),
        })
    }
}

fn check_status(op: &str, key: &str, status: u16) -> Result<(), StorageError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StorageError::Backend(format!(
            "{op} {key} returned HTTP {status}"
        )))
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status("PUT", key, response.status_code())?;
        debug!(key, size = data.len(), "Uploaded object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        check_key(key)?;
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        // S3 answers 204 whether or not the key existed.
        check_status("DELETE", key, response.status_code())?;
        Ok(true)
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }
}
