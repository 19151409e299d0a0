//! Fetched pages and the consumer interface
//!
//! A [`Page`] is produced once per successful crawl cycle and handed to the
//! caller by value. Consumers may read it however they like; they never see
//! the crawl engine's frontier or visited set.

use crate::crawler::LinkCollector;
use scraper::{Html, Selector};
use url::Url;

/// A successfully fetched and parsed page
#[derive(Debug)]
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    pub(crate) fn new(url: Url, document: Html) -> Self {
        Self { url, document }
    }

    /// Parses a page from raw bytes
    ///
    /// Bytes are decoded as UTF-8, with invalid sequences replaced. HTML
    /// parsing itself never fails; malformed markup is recovered the way
    /// browsers recover it.
    pub fn from_bytes(url: Url, bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        Self::new(url, Html::parse_document(&text))
    }

    /// The canonical URL this page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The parsed document
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Extracts the page title (from the `<title>` tag)
    pub fn title(&self) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;

        self.document
            .select(&title_selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Collects this page's links with the given collector
    pub fn links_with(&self, collector: &dyn LinkCollector) -> Vec<String> {
        collector.gather_links(&self.document).collect()
    }

    /// Consumes the page, returning its parts
    pub fn into_parts(self) -> (Url, Html) {
        (self.url, self.document)
    }
}

/// Receiver for pages produced by a crawl
///
/// Any `FnMut(Page)` closure is a consumer.
pub trait PageConsumer {
    fn consume(&mut self, page: Page);
}

impl<F: FnMut(Page)> PageConsumer for F {
    fn consume(&mut self, page: Page) {
        self(page)
    }
}
