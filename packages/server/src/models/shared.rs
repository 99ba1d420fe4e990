use crate::error::AppError;

pub const MAX_POST_CHARS: usize = 256;
pub const MAX_PROFILE_NAME_CHARS: usize = 15;
pub const MAX_BIO_CHARS: usize = 250;

/// Trim `value` and check it is 1-`max` Unicode characters.
pub fn bounded_text(value: &str, field: &str, max: usize) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(format!("{field} must be 1-{max} characters"));
    }
    Ok(value.to_string())
}

/// Validate post content (1-256 characters after trimming) and return it trimmed.
pub fn validate_post_content(content: &str) -> Result<String, AppError> {
    bounded_text(content, "Content", MAX_POST_CHARS).map_err(AppError::Validation)
}
