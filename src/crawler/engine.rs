//! Crawl engine - breadth-first crawl orchestration
//!
//! The engine owns all traversal state for one crawl session:
//! - the frontier (FIFO queue of canonical URLs awaiting fetch)
//! - the visited set (every URL ever enqueued, never shrinks)
//! - the robots policy (loaded once at construction)
//!
//! Each call to [`Crawler::advance`] runs fetch cycles until one page is
//! produced or the session ends. Per-URL failures are logged and skipped;
//! nothing after construction returns an error.

use crate::config::{validate, CollectorConfig, Config};
use crate::crawler::{
    build_http_client, AllLinks, Fetcher, FilteredLinks, LinkCollector, Page, PageConsumer,
    ScopedLinks, DEFAULT_TIMEOUT,
};
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::state::CrawlState;
use crate::url::{
    canonicalize, classify_link, normalize_domain, resolve_against_domain, same_host, LinkKind,
};
use crate::CrawlError;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::{Position, Url};

/// Builds the link collector described by the `[collector]` section
///
/// # Returns
///
/// * `Ok(Box<dyn LinkCollector>)` - Every hyperlink, or the selector-scoped
///   variant, wrapped in the requested filters
/// * `Err(CrawlError::Selector)` - The selector is not valid CSS
pub fn collector_from_config(
    config: &CollectorConfig,
) -> Result<Box<dyn LinkCollector>, CrawlError> {
    let base: Box<dyn LinkCollector> = match &config.selector {
        Some(selector) => Box::new(ScopedLinks::new(selector)?),
        None => Box::new(AllLinks),
    };

    if !(config.skip_images || config.skip_query_links || config.skip_wiki_noise) {
        return Ok(base);
    }

    let mut filtered = FilteredLinks::new(base);
    if config.skip_images {
        filtered = filtered.skip_images();
    }
    if config.skip_query_links {
        filtered = filtered.skip_query_or_fragment();
    }
    if config.skip_wiki_noise {
        filtered = filtered.skip_wiki_noise();
    }

    Ok(Box::new(filtered))
}

/// Breadth-first crawler for a single main domain
pub struct Crawler {
    name: String,
    main_domain: String,
    main_url: Url,
    follow_external: bool,
    collector: Box<dyn LinkCollector>,
    fetcher: Fetcher,
    robots: RobotsPolicy,
    frontier: VecDeque<String>,
    visited: HashSet<String>,
    state: CrawlState,
    cancel: CancellationToken,
    pages_fetched: usize,
}

impl Crawler {
    /// Creates a crawler using the collector described in the configuration
    ///
    /// See [`Crawler::with_collector`] for what construction does.
    pub async fn new(config: &Config) -> Result<Self, CrawlError> {
        let collector = collector_from_config(&config.collector)?;
        Self::with_collector(config, collector).await
    }

    /// Creates a crawler with a caller-supplied link collector
    ///
    /// The `[collector]` section of `config` is ignored. Construction:
    /// 1. Validates the configuration
    /// 2. Normalizes the main domain (trailing slashes stripped)
    /// 3. Builds the HTTP client
    /// 4. Fetches and parses robots.txt (failures give an empty policy)
    /// 5. Seeds the frontier and visited set with the main domain
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - A crawler in the `Seeded` state
    /// * `Err(CrawlError)` - The configuration is unusable
    pub async fn with_collector<C>(config: &Config, collector: C) -> Result<Self, CrawlError>
    where
        C: LinkCollector + 'static,
    {
        validate(config)?;

        let main_domain = normalize_domain(&config.crawl.domain);
        let main_url = canonicalize(&main_domain)?;

        let timeout = match config.crawl.timeout_seconds {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        let client = build_http_client(&config.user_agent, timeout)?;
        let mut fetcher = Fetcher::new(client, config.crawl.delay_seconds);

        tracing::info!(
            "[{}] Seeding crawl of {} (delay {:?}, timeout {:?})",
            config.crawl.name,
            main_domain,
            fetcher.delay(),
            timeout
        );

        let robots = fetch_robots(&mut fetcher, &main_domain).await;

        let seed = main_url.to_string();
        let mut visited = HashSet::new();
        visited.insert(seed.clone());
        let mut frontier = VecDeque::new();
        frontier.push_back(seed);

        Ok(Self {
            name: config.crawl.name.clone(),
            main_domain,
            main_url,
            follow_external: config.crawl.follow_external,
            collector: Box::new(collector),
            fetcher,
            robots,
            frontier,
            visited,
            state: CrawlState::Seeded,
            cancel: CancellationToken::new(),
            pages_fetched: 0,
        })
    }

    /// Runs fetch cycles until one page is produced or the session ends
    ///
    /// # Cycle
    ///
    /// 1. Stop if the session is terminal or cancelled
    /// 2. Pop the head of the frontier; stop (exhausted) if there is none
    /// 3. Resolve it against the main domain and validate it
    /// 4. Fetch it; on failure log and start the next cycle
    /// 5. Parse the body
    /// 6. Enqueue every new, allowed candidate link
    /// 7. Return the page
    ///
    /// # Returns
    ///
    /// * `Some(Page)` - The next page in breadth-first order
    /// * `None` - The frontier is exhausted or the crawl was cancelled; every
    ///   later call returns `None` as well
    pub async fn advance(&mut self) -> Option<Page> {
        loop {
            if self.state.is_terminal() {
                return None;
            }

            if self.cancel.is_cancelled() {
                self.suspend();
                return None;
            }

            let Some(next) = self.frontier.pop_front() else {
                tracing::info!(
                    "[{}] Frontier is empty, crawl complete ({} pages fetched)",
                    self.name,
                    self.pages_fetched
                );
                self.transition(CrawlState::Exhausted);
                return None;
            };
            self.transition(CrawlState::Running);
            tracing::debug!("[{}] Popped {}", self.name, next);

            let resolved = resolve_against_domain(&self.main_domain, &next);
            let url = match canonicalize(&resolved) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("[{}] URL not valid {}: {}", self.name, resolved, e);
                    continue;
                }
            };

            tracing::debug!("[{}] Fetching {}", self.name, url);
            let cancel = self.cancel.clone();
            let outcome = tokio::select! {
                _ = cancel.cancelled() => None,
                result = self.fetcher.fetch(&url) => Some(result),
            };

            let body = match outcome {
                None => {
                    self.suspend();
                    return None;
                }
                Some(Ok(body)) => body,
                Some(Err(e)) => {
                    tracing::warn!("[{}] Content not valid for {}: {}", self.name, url, e);
                    continue;
                }
            };

            self.pages_fetched += 1;
            let page = Page::from_bytes(url, &body);

            let candidates: Vec<String> = self.collector.gather_links(page.document()).collect();
            let mut enqueued = 0;
            for link in &candidates {
                if self.enqueue_candidate(link) {
                    enqueued += 1;
                }
            }

            tracing::debug!(
                "[{}] {}: {} links discovered, {} enqueued, {} in frontier",
                self.name,
                page.url(),
                candidates.len(),
                enqueued,
                self.frontier.len()
            );

            return Some(page);
        }
    }

    /// Drives the crawl, handing each page to `consumer`
    ///
    /// Stops when the frontier is exhausted, the crawl is cancelled, or
    /// `max_pages` pages have been delivered.
    ///
    /// # Returns
    ///
    /// The number of pages delivered to the consumer
    pub async fn run<P: PageConsumer>(
        &mut self,
        consumer: &mut P,
        max_pages: Option<usize>,
    ) -> usize {
        let mut delivered = 0;

        while max_pages.map_or(true, |max| delivered < max) {
            let Some(page) = self.advance().await else {
                break;
            };
            consumer.consume(page);
            delivered += 1;
        }

        if !self.state.is_terminal() {
            tracing::info!(
                "[{}] Page limit reached after {} pages, {} URLs left in frontier",
                self.name,
                delivered,
                self.frontier.len()
            );
        }

        delivered
    }

    /// Filters one candidate link and enqueues it if it is new and allowed
    ///
    /// The robots check runs on the raw candidate first, then on the
    /// resolved path for same-host links, so `/admin/x` and
    /// `https://site/admin/x` are both blocked by `Disallow: /admin`.
    fn enqueue_candidate(&mut self, link: &str) -> bool {
        let raw = link.trim();

        if classify_link(raw) == LinkKind::Discard {
            tracing::trace!("Discarding link {:?}", link);
            return false;
        }

        if !self.robots.is_allowed(raw) {
            tracing::debug!("Link {} disallowed by robots.txt", raw);
            return false;
        }

        let resolved = resolve_against_domain(&self.main_domain, raw);
        let url = match canonicalize(&resolved) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping malformed link {}: {}", resolved, e);
                return false;
            }
        };

        let internal = same_host(&url, &self.main_url);
        if !internal && !self.follow_external {
            tracing::trace!("Skipping external link {}", url);
            return false;
        }

        if internal && !self.robots.is_allowed(&url[Position::BeforePath..]) {
            tracing::debug!("Link {} disallowed by robots.txt", url);
            return false;
        }

        let key = url.to_string();
        if !self.visited.insert(key.clone()) {
            return false;
        }

        self.frontier.push_back(key);
        true
    }

    fn suspend(&mut self) {
        if self.state != CrawlState::Suspended {
            tracing::info!(
                "[{}] Crawl cancelled, {} URLs left in frontier",
                self.name,
                self.frontier.len()
            );
        }
        self.transition(CrawlState::Suspended);
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid crawl state transition: {} -> {}",
            self.state,
            next
        );
        if self.state != next {
            tracing::trace!("[{}] {} -> {}", self.name, self.state, next);
            self.state = next;
        }
    }

    /// Returns a token that cancels this crawl when triggered
    ///
    /// Cancellation is observed at the top of every cycle and interrupts an
    /// in-flight fetch.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Name of this crawl
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Main domain without trailing slash
    pub fn main_domain(&self) -> &str {
        &self.main_domain
    }

    /// Current lifecycle state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Robots policy loaded at construction
    pub fn robots(&self) -> &RobotsPolicy {
        &self.robots
    }

    /// Number of URLs waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Number of URLs ever scheduled, the seed included
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if `url` (canonical form) has been scheduled
    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of successful fetches so far (robots.txt excluded)
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Effective politeness delay
    pub fn delay(&self) -> Duration {
        self.fetcher.delay()
    }
}
