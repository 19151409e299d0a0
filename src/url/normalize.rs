use crate::url::classify::{is_absolute_url, is_domain_relative_path};
use crate::UrlError;
use url::Url;

/// Strips surrounding whitespace and trailing slashes from a main domain
///
/// # Examples
///
/// ```
/// use polite_crawler::url::normalize_domain;
///
/// assert_eq!(normalize_domain("https://example.com/"), "https://example.com");
/// assert_eq!(normalize_domain("https://example.com"), "https://example.com");
/// ```
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('/').to_string()
}

/// Resolves a link target against the main domain
///
/// # Resolution Rules
///
/// 1. Absolute URLs are returned unchanged
/// 2. Protocol-relative targets (`//host/path`) borrow the domain's scheme
/// 3. Domain-relative paths (`/path`) are appended to the domain
/// 4. Anything else is appended to the domain after a `/`
///
/// The result is a string; it still has to pass [`canonicalize`] before it
/// can be fetched.
///
/// # Arguments
///
/// * `domain` - The main domain, already stripped of trailing slashes
/// * `link` - The raw link target
///
/// # Examples
///
/// ```
/// use polite_crawler::url::resolve_against_domain;
///
/// let domain = "https://example.com";
/// assert_eq!(resolve_against_domain(domain, "/foo.html"), "https://example.com/foo.html");
/// assert_eq!(resolve_against_domain(domain, "foo.html"), "https://example.com/foo.html");
/// ```
pub fn resolve_against_domain(domain: &str, link: &str) -> String {
    let link = link.trim();

    if is_absolute_url(link) {
        return link.to_string();
    }

    if link.starts_with("//") {
        let scheme = domain.split_once("://").map_or("https", |(s, _)| s);
        return format!("{}:{}", scheme, link);
    }

    if is_domain_relative_path(link) {
        format!("{}{}", domain, link)
    } else {
        format!("{}/{}", domain, link)
    }
}

/// Validates a resolved link and returns its canonical form
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (it never reaches the server)
///
/// The host is lowercased and an empty path becomes `/` by the parser itself,
/// so `https://EXAMPLE.com` and `https://example.com/` canonicalize equally.
/// Query strings are kept: two URLs that differ only by query stay distinct.
///
/// # Arguments
///
/// * `url_str` - The resolved URL string
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL ready to fetch
/// * `Err(UrlError)` - The string is not a fetchable absolute URL
pub fn canonicalize(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns true if both URLs belong to the same site
///
/// With matching schemes the host and port must both match. Across `http`
/// and `https` only the host is compared, so `http://site/x` stays internal
/// to an `https://site` crawl even though the default ports differ.
pub fn same_host(a: &Url, b: &Url) -> bool {
    if a.host_str() != b.host_str() {
        return false;
    }
    a.scheme() != b.scheme() || a.port_or_known_default() == b.port_or_known_default()
}
