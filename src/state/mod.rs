//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Lifecycle of one crawl session (seeded, running, exhausted, suspended)

mod crawl_state;

pub use crawl_state::CrawlState;
