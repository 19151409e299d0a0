//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a politeness delay
//! - Link collection strategies
//! - The breadth-first crawl engine
//! - The page type handed to consumers

mod collector;
mod engine;
mod fetcher;
mod page;

pub use collector::{AllLinks, FilteredLinks, LinkCollector, ScopedLinks};
pub use engine::{collector_from_config, Crawler};
pub use fetcher::{
    build_http_client, clamp_delay, FetchError, Fetcher, DEFAULT_DELAY, DEFAULT_TIMEOUT,
};
pub use page::{Page, PageConsumer};

pub use crate::state::CrawlState;
