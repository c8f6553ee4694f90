//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, including:
//! - Validating the seed and budget
//! - Driving the breadth-first frontier
//! - Dispatching fetches in bounded concurrent batches
//! - Enqueueing same-site links in discovery order
//! - Honoring cancellation and the politeness delay

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, probe_resource, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_page;
use crate::page::{PageRecord, ResourceProbe, SiteContext};
use crate::robots::{robots_url, ParsedRobots};
use crate::url::{is_same_site, normalize_url, parse_seed};
use crate::CrawlError;
use reqwest::Client;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A reusable site crawler
///
/// One crawler may run many crawls; each call to [`Crawler::crawl`] owns its
/// own frontier and result list.
pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
    agent_token: String,
    cancel: CancellationToken,
}

impl Crawler {
    /// Creates a crawler with its HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Concurrency, delay and timeout settings
    /// * `agent` - User agent identification
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &CrawlerConfig, agent: &UserAgentConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config, agent)?;
        Ok(Self {
            client,
            config: config.clone(),
            agent_token: agent.crawler_name.clone(),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token
    ///
    /// Cancelling the token stops new fetches; pages already collected are
    /// returned from [`Crawler::crawl`] as a normal result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token that cancels this crawler's crawls
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls a site breadth-first
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Absolute http(s) URL; its host (with `www.`
    ///   equivalence) defines the crawl scope
    /// * `max_pages` - Maximum number of pages returned, at least 1
    ///
    /// # Returns
    ///
    /// Pages in visit order, seed first. Pages whose fetch failed at network
    /// level are not included and do not count against the budget.
    pub async fn crawl(
        &self,
        seed_url: &str,
        max_pages: usize,
    ) -> Result<Vec<PageRecord>, CrawlError> {
        self.crawl_observed(seed_url, max_pages, |_, _| {}).await
    }

    /// Same as [`Crawler::crawl`], calling `on_page(url, pages_so_far)` as
    /// each page is accepted
    pub async fn crawl_observed<F>(
        &self,
        seed_url: &str,
        max_pages: usize,
        on_page: F,
    ) -> Result<Vec<PageRecord>, CrawlError>
    where
        F: FnMut(&str, usize),
    {
        self.crawl_until(seed_url, max_pages, &self.cancel, on_page)
            .await
    }

    /// Same as [`Crawler::crawl_observed`], stopping when `cancel` fires
    ///
    /// Pass a child of [`Crawler::cancellation_token`] to bound a single
    /// crawl without cancelling the crawler itself.
    pub async fn crawl_until<F>(
        &self,
        seed_url: &str,
        max_pages: usize,
        cancel: &CancellationToken,
        mut on_page: F,
    ) -> Result<Vec<PageRecord>, CrawlError>
    where
        F: FnMut(&str, usize),
    {
        let seed = parse_seed(seed_url)?;
        if max_pages == 0 {
            return Err(CrawlError::InvalidBudget(max_pages));
        }

        tracing::info!("Starting crawl of {} (budget {} pages)", seed, max_pages);
        let start_time = Instant::now();

        let robots = if self.config.respect_robots_txt {
            self.fetch_robots(&seed).await
        } else {
            None
        };
        let delay = self.effective_delay(robots.as_ref());

        let mut frontier = Frontier::new(seed.clone());
        let mut pages: Vec<PageRecord> = Vec::new();

        while pages.len() < max_pages && !cancel.is_cancelled() {
            let want = self
                .config
                .max_concurrent_fetches
                .max(1)
                .min(max_pages - pages.len());
            let batch = self.next_batch(&mut frontier, want, robots.as_ref());
            if batch.is_empty() {
                tracing::debug!("Frontier is empty, crawl complete");
                break;
            }

            let outcomes = self.fetch_batch(&batch, cancel).await;
            let mut landed: HashSet<String> = HashSet::new();

            for (requested, outcome) in batch.iter().zip(outcomes) {
                let Some((record, final_url)) = outcome else {
                    continue;
                };

                // Reached through an earlier redirect in this batch
                if landed.contains(requested.as_str()) {
                    tracing::debug!("Skipping {}: already reached by a redirect", requested);
                    continue;
                }
                landed.insert(final_url.as_str().to_string());

                if is_same_site(&final_url, &seed) {
                    frontier.mark_visited(&final_url);
                }

                for link in &record.links {
                    let Ok(normalized) = normalize_url(link) else {
                        continue;
                    };
                    if is_same_site(&normalized, &seed) {
                        frontier.push(normalized);
                    }
                }

                pages.push(record);
                if let Some(page) = pages.last() {
                    on_page(&page.url, pages.len());
                }

                if pages.len() % 10 == 0 {
                    let elapsed = start_time.elapsed().as_secs_f64();
                    tracing::info!(
                        "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                        pages.len(),
                        frontier.len(),
                        pages.len() as f64 / elapsed.max(f64::EPSILON)
                    );
                }
            }

            if pages.len() >= max_pages || frontier.is_empty() {
                break;
            }

            if !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        if cancel.is_cancelled() {
            tracing::warn!(
                "Crawl of {} cancelled after {} pages",
                seed,
                pages.len()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages crawled in {:?}",
            pages.len(),
            start_time.elapsed()
        );

        Ok(pages)
    }

    /// Fetches robots.txt and the sitemap for the seed's site
    ///
    /// The sitemap location is the first `Sitemap:` directive of robots.txt,
    /// falling back to `/sitemap.xml`.
    pub async fn probe_site(&self, seed_url: &str) -> Result<SiteContext, CrawlError> {
        let seed = parse_seed(seed_url)?;

        let robots_txt = match robots_url(&seed) {
            Some(url) => probe_resource(&self.client, url.as_str()).await,
            None => ResourceProbe::NotChecked,
        };

        let declared = robots_txt
            .body()
            .map(|body| ParsedRobots::from_content(body).sitemaps())
            .unwrap_or_default();
        let sitemap_url = declared
            .iter()
            .find_map(|s| seed.join(s).ok())
            .or_else(|| seed.join("/sitemap.xml").ok());

        let sitemap = match sitemap_url {
            Some(url) => probe_resource(&self.client, url.as_str()).await,
            None => ResourceProbe::NotChecked,
        };

        tracing::debug!(
            "Site probe for {}: robots.txt checked={}, sitemap checked={}",
            seed,
            robots_txt.is_checked(),
            sitemap.is_checked()
        );

        Ok(SiteContext {
            robots_txt,
            sitemap,
        })
    }

    /// Pops up to `want` unvisited URLs, skipping those robots.txt forbids
    fn next_batch(
        &self,
        frontier: &mut Frontier,
        want: usize,
        robots: Option<&ParsedRobots>,
    ) -> Vec<Url> {
        let mut batch = Vec::with_capacity(want);
        while batch.len() < want {
            let Some(url) = frontier.pop_unvisited() else {
                break;
            };
            if let Some(robots) = robots {
                if !robots.is_allowed(url.as_str(), &self.agent_token) {
                    tracing::debug!("URL {} disallowed by robots.txt", url);
                    continue;
                }
            }
            batch.push(url);
        }
        batch
    }

    /// Fetches a batch concurrently; results come back in dispatch order
    async fn fetch_batch(
        &self,
        batch: &[Url],
        cancel: &CancellationToken,
    ) -> Vec<Option<(PageRecord, Url)>> {
        let mut outcomes: Vec<Option<(PageRecord, Url)>> = vec![None; batch.len()];
        let mut tasks = JoinSet::new();

        for (index, url) in batch.iter().enumerate() {
            let client = self.client.clone();
            let url = url.clone();
            tasks.spawn(async move { (index, fetch_page(&client, url).await) });
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    break;
                }
                joined = tasks.join_next() => match joined {
                    Some(Ok((index, outcome))) => outcomes[index] = outcome,
                    Some(Err(e)) => tracing::warn!("Fetch task failed: {}", e),
                    None => break,
                },
            }
        }

        outcomes
    }

    async fn fetch_robots(&self, seed: &Url) -> Option<ParsedRobots> {
        let url = robots_url(seed)?;
        match probe_resource(&self.client, url.as_str()).await {
            ResourceProbe::Found(body) => Some(ParsedRobots::from_content(&body)),
            _ => None,
        }
    }

    /// Politeness delay, raised to robots.txt's Crawl-delay when longer
    fn effective_delay(&self, robots: Option<&ParsedRobots>) -> Duration {
        let configured = Duration::from_millis(self.config.politeness_delay_ms);
        let crawl_delay = robots
            .and_then(|r| r.crawl_delay(&self.agent_token))
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(Duration::from_secs_f64);

        match crawl_delay {
            Some(d) if d > configured => d,
            _ => configured,
        }
    }
}

/// Fetches and parses one page; None when the page is dropped
async fn fetch_page(client: &Client, url: Url) -> Option<(PageRecord, Url)> {
    match fetch_url(client, url.as_str()).await {
        FetchResult::Success(fetched) => {
            let final_url = Url::parse(&fetched.final_url).unwrap_or_else(|_| url.clone());
            tracing::debug!("Fetched {} ({})", url, fetched.status_code);

            let mut record = parse_page(&url, &final_url, fetched.body);
            record.status_code = fetched.status_code;
            record.content_type = fetched.content_type;
            record.headers = fetched.headers;
            record.load_time = fetched.elapsed.as_secs_f64();

            let final_url = normalize_url(final_url.as_str()).unwrap_or(final_url);
            Some((record, final_url))
        }
        FetchResult::ContentMismatch { content_type } => {
            tracing::debug!("Skipping {}: not HTML ({})", url, content_type);
            None
        }
        FetchResult::NetworkError { error, kind } => {
            tracing::warn!("Dropping {} after {:?} error: {}", url, kind, error);
            None
        }
    }
}

/// Crawls with the default configuration
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), seo_audit::CrawlError> {
/// let pages = seo_audit::crawler::crawl("https://example.com", 10).await?;
/// println!("{} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed_url: &str, max_pages: usize) -> Result<Vec<PageRecord>, CrawlError> {
    Crawler::new(&CrawlerConfig::default(), &UserAgentConfig::default())?
        .crawl(seed_url, max_pages)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler() -> Crawler {
        Crawler::new(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_invalid_seed() {
        let result = crawler().crawl("not-a-url", 5).await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));

        let result = crawler().crawl("ftp://example.com/", 5).await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
    }

    #[tokio::test]
    async fn test_rejects_zero_budget() {
        let result = crawler().crawl("https://example.com/", 0).await;
        assert!(matches!(result, Err(CrawlError::InvalidBudget(0))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let crawler = crawler().with_cancellation(token);

        let pages = crawler.crawl("https://example.com/", 5).await.unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_effective_delay_prefers_longer_crawl_delay() {
        let crawler = crawler();
        let robots = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 2");
        assert_eq!(crawler.effective_delay(Some(&robots)), Duration::from_secs(2));

        let short = ParsedRobots::from_content("User-agent: *\nCrawl-delay: 0.1");
        assert_eq!(
            crawler.effective_delay(Some(&short)),
            Duration::from_millis(500)
        );
        assert_eq!(crawler.effective_delay(None), Duration::from_millis(500));
    }
}
