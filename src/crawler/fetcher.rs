//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Enforcing a politeness delay between consecutive requests
//! - Classifying failures (network, timeout, bad status, empty body)

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

/// Delay used when the configured delay is not positive
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reasons a fetch produced no usable content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Empty response body")]
    EmptyBody,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Network(format!("Connection refused: {}", e))
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound for a single request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use polite_crawler::config::UserAgentConfig;
/// use polite_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "PoliteCrawler".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Clamps a configured delay in seconds to a usable duration
///
/// Zero, negative, NaN, infinite and overflowing values all fall back to
/// [`DEFAULT_DELAY`].
pub fn clamp_delay(seconds: f64) -> Duration {
    if !(seconds.is_finite() && seconds > 0.0) {
        return DEFAULT_DELAY;
    }

    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|d| !d.is_zero())
        .unwrap_or(DEFAULT_DELAY)
}

/// Performs GET requests while keeping a minimum gap between them
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
    last_request: Option<Instant>,
}

impl Fetcher {
    /// Creates a fetcher; `delay_seconds` is clamped with [`clamp_delay`]
    pub fn new(client: Client, delay_seconds: f64) -> Self {
        Self {
            client,
            delay: clamp_delay(delay_seconds),
            last_request: None,
        }
    }

    /// Returns the effective politeness delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetches a URL and returns its body
    ///
    /// # Failure Cases
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Connection or DNS failure | `Network` |
    /// | Request exceeded the client timeout | `Timeout` |
    /// | Non-2xx status after redirects | `Status` |
    /// | 2xx with zero-length body | `EmptyBody` |
    ///
    /// There is no retry; the caller decides what a failure means.
    pub async fn fetch(&mut self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.wait_turn().await;

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body.to_vec())
    }

    /// Sleeps until the politeness delay since the previous request has passed
    async fn wait_turn(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.delay;
            let remaining = ready_at.saturating_duration_since(Instant::now());
            if !remaining.is_zero() {
                tracing::trace!("Waiting {:?} before next request", remaining);
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
