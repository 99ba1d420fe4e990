/// Longest file extension kept on a generated key, excluding the dot.
const MAX_EXTENSION_LEN: usize = 10;

/// Extension of `filename` including the leading dot, if it is a plain
/// ASCII-alphanumeric suffix of reasonable length.
///
/// ```
/// use common::storage::file_extension;
///
/// assert_eq!(file_extension("me.JPG"), Some(".JPG"));
/// assert_eq!(file_extension("archive.tar.gz"), Some(".gz"));
/// assert_eq!(file_extension("README"), None);
/// ```
pub fn file_extension(filename: &str) -> Option<&str> {
    let dot = filename.rfind('.')?;
    let ext = &filename[dot + 1..];
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(&filename[dot..])
}

/// Six lowercase hex characters from three random bytes.
pub fn random_suffix() -> String {
    hex::encode(rand::random::<[u8; 3]>())
}

/// Build an object key for an uploaded photo: `{prefix}{6 hex}{.ext}`.
pub fn photo_key(prefix: &str, filename: &str) -> String {
    let ext = file_extension(filename).unwrap_or("");
    format!("{prefix}{}{ext}", random_suffix())
}
