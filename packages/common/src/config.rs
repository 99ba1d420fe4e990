use serde::Deserialize;

/// Which object store holds uploaded profile photos.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3-compatible bucket. Requires the `object-storage` feature.
    S3,
    /// Local directory, one sub-directory per bucket.
    #[default]
    Filesystem,
}

/// Object storage configuration for profile photos.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Bucket name. Default: "flock-photos".
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Public base URL; the photo URL is `{base_url}{bucket}/{key}`.
    /// Default: "http://localhost:9000/".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key prefix for photo objects. Default: "profile_photos/".
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Maximum accepted photo size in bytes. Default: 10 MiB.
    #[serde(default = "default_max_photo_size")]
    pub max_photo_size: u64,
    /// S3 region name. Default: "us-east-1".
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom S3 endpoint (MinIO, R2, ...). Uses AWS when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Use path-style bucket addressing. Default: false.
    #[serde(default)]
    pub path_style: bool,
    /// Access key. Falls back to `AWS_ACCESS_KEY_ID` when unset.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret key. Falls back to `AWS_SECRET_ACCESS_KEY` when unset.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Root directory of the filesystem backend. Default: "./data/objects".
    #[serde(default = "default_local_dir")]
    pub local_dir: String,
}

fn default_bucket() -> String {
    "flock-photos".into()
}
fn default_base_url() -> String {
    "http://localhost:9000/".into()
}
fn default_key_prefix() -> String {
    "profile_photos/".into()
}
fn default_max_photo_size() -> u64 {
    10 * 1024 * 1024
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_local_dir() -> String {
    "./data/objects".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
            base_url: default_base_url(),
            key_prefix: default_key_prefix(),
            max_photo_size: default_max_photo_size(),
            region: default_region(),
            endpoint: None,
            path_style: false,
            access_key: None,
            secret_key: None,
            local_dir: default_local_dir(),
        }
    }
}

impl StorageConfig {
    /// Public URL of an object stored under `key`.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.base_url, self.bucket, key)
    }
}
