//! Pure predicates over link targets
//!
//! None of these functions allocate state or fail; an empty string is never a
//! valid URL, path, or resource.

use url::Url;

/// Image extensions that never lead to a document
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns true if `s` parses as an absolute URL with both a scheme and a host
///
/// # Examples
///
/// ```
/// use polite_crawler::url::is_absolute_url;
///
/// assert!(is_absolute_url("https://example.com/page"));
/// assert!(!is_absolute_url("/page"));
/// assert!(!is_absolute_url("mailto:someone@example.com"));
/// ```
pub fn is_absolute_url(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    match Url::parse(s) {
        Ok(url) => url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Returns true if `s` is a path rooted at the domain (starts with `/`)
pub fn is_domain_relative_path(s: &str) -> bool {
    s.starts_with('/')
}

/// Returns true if the path extension of `s` is a known image type
///
/// Query strings and fragments are ignored, and the comparison is
/// case-insensitive, so `/img/Logo.PNG?v=2` is an image.
pub fn is_image_resource(s: &str) -> bool {
    let path = s.split(['?', '#']).next().unwrap_or_default();
    let last_segment = path.rsplit('/').next().unwrap_or_default();

    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}

/// Returns true if `s` carries a query (`?`) or a fragment (`#`)
pub fn has_query_or_fragment(s: &str) -> bool {
    s.contains(['?', '#'])
}

/// Returns true if `s` points at a wiki media description page (`File:`)
pub fn is_wiki_file(s: &str) -> bool {
    s.contains("File:")
}

/// Returns true if `s` points at a wiki project namespace page (`Wikipedia:`)
pub fn is_wiki_meta(s: &str) -> bool {
    s.contains("Wikipedia:")
}
