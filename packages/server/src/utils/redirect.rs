use axum::http::{HeaderMap, Uri, header};

/// Where to send the user after an in-page action such as a like.
///
/// Uses the path and query of the `Referer` header so the redirect never
/// leaves this site; falls back to `fallback` when the header is missing or
/// unusable.
pub fn back_to_referrer(headers: &HeaderMap, fallback: &str) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| fallback.to_string())
}

/// A same-site absolute path: starts with one `/` and is not scheme-relative.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
