use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is empty, absolute, or escapes the bucket.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The store could not be constructed from its configuration.
    #[error("storage configuration error: {0}")]
    Config(String),

    /// The remote store rejected or failed the request.
    #[error("object store request failed: {0}")]
    Backend(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
