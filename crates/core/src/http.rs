//! URL and response-body helpers shared by the HTTP clients.

use url::Url;

/// Maximum number of characters of a response body kept in logs and errors.
pub const BODY_PREVIEW_CHARS: usize = 500;

/// Join a base URL and a relative path without losing the base's path prefix.
#[must_use]
pub fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), path)
}

/// Percent-encode one path segment (ids may contain `/` or spaces).
#[must_use]
pub fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// The first [`BODY_PREVIEW_CHARS`] characters of a response body.
#[must_use]
pub fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
