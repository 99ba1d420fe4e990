mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::path::PathBuf;
use std::sync::Arc;

pub use error::StorageError;
pub use key::{file_extension, photo_key, random_suffix};
pub use traits::PhotoStore;

use crate::config::{StorageBackend, StorageConfig};

/// Construct the configured photo store.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn PhotoStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = filesystem::FilesystemPhotoStore::new(
                PathBuf::from(&config.local_dir),
                config.bucket.clone(),
                config.base_url.clone(),
            )
            .await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => Ok(Arc::new(s3::S3PhotoStore::new(config)?)),
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Config(
            "S3 backend requires the `object-storage` feature".into(),
        )),
    }
}
