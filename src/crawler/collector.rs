//! Link collectors
//!
//! A collector proposes candidate link targets from a parsed page. The engine
//! holds one behind the [`LinkCollector`] trait; any type implementing it can
//! be swapped in.
//!
//! Collectors return hrefs verbatim. Resolution, robots checks and
//! de-duplication happen in the engine.

use crate::url::{has_query_or_fragment, is_image_resource, is_wiki_file, is_wiki_meta};
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};

/// Capability of extracting candidate links from a parsed page
///
/// The returned iterator makes a single pass over the document; call
/// `gather_links` again to walk the page a second time.
pub trait LinkCollector: Send + Sync {
    fn gather_links<'a>(&'a self, document: &'a Html) -> Box<dyn Iterator<Item = String> + 'a>;
}

impl<C: LinkCollector + ?Sized> LinkCollector for Box<C> {
    fn gather_links<'a>(&'a self, document: &'a Html) -> Box<dyn Iterator<Item = String> + 'a> {
        (**self).gather_links(document)
    }
}

/// Yields the `href` of every `<a>` element at or below `element`
fn hrefs_under(element: ElementRef<'_>) -> impl Iterator<Item = String> + '_ {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
        .filter_map(|e| e.value().attr("href").map(str::to_string))
}

/// Default collector: every hyperlink target in the document
#[derive(Debug, Clone, Copy, Default)]
pub struct AllLinks;

impl LinkCollector for AllLinks {
    fn gather_links<'a>(&'a self, document: &'a Html) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(hrefs_under(document.root_element()))
    }
}

/// Collects hyperlinks only inside regions matching a CSS selector
///
/// Useful for catalogue-style sites where only product cards or the pager
/// lead to interesting pages.
#[derive(Debug, Clone)]
pub struct ScopedLinks {
    selector_text: String,
    regions: Selector,
}

impl ScopedLinks {
    /// Creates a scoped collector
    ///
    /// # Returns
    ///
    /// * `Ok(ScopedLinks)` - The selector parsed
    /// * `Err(CrawlError::Selector)` - The selector is not valid CSS
    ///
    /// # Example
    ///
    /// ```
    /// use polite_crawler::ScopedLinks;
    ///
    /// assert!(ScopedLinks::new("article.product_pod").is_ok());
    /// assert!(ScopedLinks::new("article[[").is_err());
    /// ```
    pub fn new(selector: &str) -> Result<Self, CrawlError> {
        let regions = Selector::parse(selector).map_err(|e| CrawlError::Selector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            selector_text: selector.to_string(),
            regions,
        })
    }

    /// Returns the selector this collector was built from
    pub fn selector(&self) -> &str {
        &self.selector_text
    }
}

impl LinkCollector for ScopedLinks {
    fn gather_links<'a>(&'a self, document: &'a Html) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(document.select(&self.regions).flat_map(hrefs_under))
    }
}

/// Wraps another collector and drops targets matched by reject predicates
pub struct FilteredLinks<C> {
    inner: C,
    rejects: Vec<fn(&str) -> bool>,
}

impl<C: LinkCollector> FilteredLinks<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            rejects: Vec::new(),
        }
    }

    /// Drops targets matched by `predicate`
    pub fn reject(mut self, predicate: fn(&str) -> bool) -> Self {
        self.rejects.push(predicate);
        self
    }

    /// Drops png/jpg/jpeg targets
    pub fn skip_images(self) -> Self {
        self.reject(is_image_resource)
    }

    /// Drops targets carrying a query or fragment
    pub fn skip_query_or_fragment(self) -> Self {
        self.reject(has_query_or_fragment)
    }

    /// Drops wiki media and project-namespace pages
    pub fn skip_wiki_noise(self) -> Self {
        self.reject(is_wiki_file).reject(is_wiki_meta)
    }
}

impl<C: LinkCollector> LinkCollector for FilteredLinks<C> {
    fn gather_links<'a>(&'a self, document: &'a Html) -> Box<dyn Iterator<Item = String> + 'a> {
        Box::new(
            self.inner
                .gather_links(document)
                .filter(move |link| !self.rejects.iter().any(|reject| reject(link))),
        )
    }
}
