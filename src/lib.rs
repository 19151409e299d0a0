//! Polite Crawler: a breadth-first, robots-aware web crawler
//!
//! This crate walks a single site starting from its main domain, honoring the
//! site's robots.txt, never fetching the same URL twice, and handing each
//! successfully fetched page to a caller-supplied consumer.

pub mod config;
pub mod crawler;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for construction-time failures
///
/// Per-URL failures (bad links, transport errors) never surface here; the
/// crawl engine absorbs and logs them.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid main domain: {0}")]
    InvalidDomain(#[from] UrlError),

    #[error("Invalid link collector selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawler construction
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    AllLinks, CrawlState, Crawler, FilteredLinks, LinkCollector, Page, PageConsumer, ScopedLinks,
};
pub use robots::RobotsPolicy;
