//! URL handling module
//!
//! This module provides the pure predicates used to classify link targets and
//! the normalization rules that turn a discovered link into a fetchable URL.

mod classify;
mod normalize;

// Re-export main functions
pub use classify::{
    has_query_or_fragment, is_absolute_url, is_domain_relative_path, is_image_resource,
    is_wiki_file, is_wiki_meta,
};
pub use normalize::{canonicalize, normalize_domain, resolve_against_domain, same_host};

/// Shape of a raw link target as found in a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A complete http(s) URL with a host
    Absolute,
    /// A path rooted at the domain, such as `/catalogue/a.html`
    DomainRelative,
    /// A bare token such as `a.html`, joined to the domain with a slash
    Bare,
    /// Empty, same-page anchor, or a non-http(s) scheme; never enqueued
    Discard,
}

impl LinkKind {
    /// Returns true if a link of this kind can be resolved into a fetchable URL
    pub fn is_followable(&self) -> bool {
        !matches!(self, Self::Discard)
    }
}

/// Classifies a raw link target
///
/// # Examples
///
/// ```
/// use polite_crawler::url::{classify_link, LinkKind};
///
/// assert_eq!(classify_link("https://example.com/a"), LinkKind::Absolute);
/// assert_eq!(classify_link("/a.html"), LinkKind::DomainRelative);
/// assert_eq!(classify_link("a.html"), LinkKind::Bare);
/// assert_eq!(classify_link("mailto:me@example.com"), LinkKind::Discard);
/// ```
pub fn classify_link(link: &str) -> LinkKind {
    let link = link.trim();

    if link.is_empty() || link.starts_with('#') {
        return LinkKind::Discard;
    }

    if is_absolute_url(link) {
        return match ::url::Url::parse(link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => LinkKind::Absolute,
            _ => LinkKind::Discard,
        };
    }

    // Schemes without a host (mailto:, javascript:, tel:, data:)
    if ::url::Url::parse(link).is_ok() {
        return LinkKind::Discard;
    }

    if is_domain_relative_path(link) {
        LinkKind::DomainRelative
    } else {
        LinkKind::Bare
    }
}
