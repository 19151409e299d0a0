use serde::Deserialize;

/// Main configuration structure for a crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

impl Config {
    /// Creates a configuration for `domain` with every other setting at its default
    ///
    /// # Example
    ///
    /// ```
    /// use polite_crawler::Config;
    ///
    /// let config = Config::for_domain("books", "https://books.toscrape.com/");
    /// assert_eq!(config.crawl.delay_seconds, 1.0);
    /// assert!(config.collector.selector.is_none());
    /// ```
    pub fn for_domain(name: &str, domain: &str) -> Self {
        Self {
            crawl: CrawlConfig {
                name: name.to_string(),
                domain: domain.to_string(),
                delay_seconds: default_delay_seconds(),
                timeout_seconds: default_timeout_seconds(),
                follow_external: false,
            },
            collector: CollectorConfig::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Name of this crawl, used in logs
    pub name: String,

    /// Main domain; the crawl is seeded with it and robots.txt is read from it
    pub domain: String,

    /// Minimum time between consecutive requests (seconds, clamped to a positive value)
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Upper bound for a single request (seconds, 0 means the default)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Whether links to other hosts are enqueued
    #[serde(rename = "follow-external", default)]
    pub follow_external: bool,
}

fn default_delay_seconds() -> f64 {
    1.0
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Link collector configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorConfig {
    /// CSS selector restricting link collection to matching regions
    #[serde(default)]
    pub selector: Option<String>,

    /// Drop png/jpg/jpeg targets
    #[serde(rename = "skip-images", default)]
    pub skip_images: bool,

    /// Drop targets containing '?' or '#'
    #[serde(rename = "skip-query-links", default)]
    pub skip_query_links: bool,

    /// Drop wiki `File:` and `Wikipedia:` pages
    #[serde(rename = "skip-wiki-noise", default)]
    pub skip_wiki_noise: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler (optional, empty to omit)
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact (optional, empty to omit)
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`, with the
    /// parenthesized part dropped when no contact is configured.
    pub fn header_value(&self) -> String {
        let contacts: Vec<String> = [
            (!self.contact_url.is_empty()).then(|| format!("+{}", self.contact_url)),
            (!self.contact_email.is_empty()).then(|| self.contact_email.clone()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contacts.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contacts.join("; ")
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}
