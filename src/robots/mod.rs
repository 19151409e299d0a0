//! Robots.txt handling module
//!
//! This module provides functionality for fetching and parsing a site's
//! robots.txt into a [`RobotsPolicy`]. Every failure along the way degrades to
//! an empty policy so the crawl can proceed.

mod parser;

pub use parser::RobotsPolicy;

use crate::crawler::Fetcher;
use crate::url::canonicalize;

/// Fetches robots.txt for a main domain
///
/// # Arguments
///
/// * `fetcher` - The fetcher to use (the request counts toward politeness)
/// * `domain` - The main domain, without a trailing slash
///
/// # Returns
///
/// The parsed policy, or an empty policy if robots.txt could not be fetched
pub async fn fetch_robots(fetcher: &mut Fetcher, domain: &str) -> RobotsPolicy {
    let robots_url = match canonicalize(&format!("{}/robots.txt", domain)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", domain, e);
            return RobotsPolicy::allow_all();
        }
    };

    tracing::debug!("Fetching robots.txt from {}", robots_url);

    match fetcher.fetch(&robots_url).await {
        Ok(bytes) => {
            let policy = RobotsPolicy::build(&bytes);
            tracing::info!(
                "Loaded robots.txt for {} ({} disallowed prefixes)",
                domain,
                policy.len()
            );
            policy
        }
        Err(e) => {
            tracing::warn!("Error while reading robots.txt for {}: {}", domain, e);
            RobotsPolicy::allow_all()
        }
    }
}
