//! Audit orchestration: crawl, probe, check, score

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::score::{AuditMetadata, AuditOutcome};
use super::status::AuditStatus;
use crate::checks::{CheckRegistry, CheckResult};
use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::crawler::Crawler;
use crate::page::{PageRecord, SiteContext};
use crate::{AuditError, CrawlError};

/// Receives progress events from an [`AuditRunner`]
///
/// Both methods default to doing nothing.
pub trait AuditObserver: Send + Sync {
    /// Called after every status change
    fn on_status(&self, _status: AuditStatus) {}

    /// Called as each page is accepted by the crawl
    fn on_page(&self, _url: &str, _crawled: usize, _budget: usize) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AuditObserver for NoopObserver {}

/// Everything one audit run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub seed_url: String,
    pub status: AuditStatus,
    pub outcome: AuditOutcome,
    /// Check results in registry order
    pub results: Vec<CheckResult>,
    pub metadata: AuditMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditReport {
    pub fn is_completed(&self) -> bool {
        self.status == AuditStatus::Completed
    }
}

/// Runs audits with one crawler and one check registry
pub struct AuditRunner {
    crawler: Crawler,
    registry: CheckRegistry,
    observer: Arc<dyn AuditObserver>,
    probe_site: bool,
    audit_timeout: Option<Duration>,
}

impl AuditRunner {
    /// Runner with the standard registry, site probing on and no deadline
    pub fn new(crawler: Crawler) -> Self {
        Self {
            crawler,
            registry: CheckRegistry::standard(),
            observer: Arc::new(NoopObserver),
            probe_site: true,
            audit_timeout: None,
        }
    }

    /// Builds the crawler and runner settings from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let crawler = Crawler::new(&config.crawler, &config.user_agent)?;
        let timeout = match config.crawler.audit_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self::new(crawler)
            .with_site_probe(config.crawler.probe_site_files)
            .with_timeout(timeout))
    }

    pub fn with_registry(mut self, registry: CheckRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AuditObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Whether robots.txt and the sitemap are fetched before scoring
    pub fn with_site_probe(mut self, enabled: bool) -> Self {
        self.probe_site = enabled;
        self
    }

    /// Deadline for the crawl phase; pages collected before it are scored
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.audit_timeout = timeout;
        self
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Runs one audit to completion
    ///
    /// Never returns an error: crawl input errors and illegal status
    /// transitions produce a report with [`AuditStatus::Failed`] and an
    /// error message. A crawl that collects no pages completes with no
    /// results and a score of 0; one stopped by the deadline is scored as
    /// usual.
    pub async fn run_audit(&self, seed_url: &str, max_pages: usize) -> AuditReport {
        self.run(seed_url, max_pages, None::<fn(&AuditReport) -> Result<(), AuditError>>)
            .await
    }

    /// Same as [`AuditRunner::run_audit`], rendering the report before the
    /// audit completes
    ///
    /// After analysis the status moves to
    /// [`AuditStatus::GeneratingReport`] and `render` is called with the
    /// finished report. An error from `render` fails the audit; the scored
    /// results are kept in the failed report.
    pub async fn run_audit_with_report<F>(
        &self,
        seed_url: &str,
        max_pages: usize,
        render: F,
    ) -> AuditReport
    where
        F: FnOnce(&AuditReport) -> Result<(), AuditError>,
    {
        self.run(seed_url, max_pages, Some(render)).await
    }

    async fn run<F>(&self, seed_url: &str, max_pages: usize, render: Option<F>) -> AuditReport
    where
        F: FnOnce(&AuditReport) -> Result<(), AuditError>,
    {
        let started_at = Utc::now();
        let mut status = AuditStatus::Pending;
        info!("Starting audit of {}", seed_url);

        let (pages, results) = match self.execute(seed_url, max_pages, &mut status).await {
            Ok(executed) => executed,
            Err(e) => {
                let mut report = AuditReport {
                    seed_url: seed_url.to_string(),
                    status,
                    outcome: AuditOutcome::default(),
                    results: Vec::new(),
                    metadata: AuditMetadata::from_pages(started_at, Utc::now(), &[]),
                    error_message: None,
                };
                self.fail(&mut report, &mut status, e);
                return report;
            }
        };

        let outcome = AuditOutcome::from_results(pages.len(), &results);
        let mut report = AuditReport {
            seed_url: seed_url.to_string(),
            status: AuditStatus::Completed,
            outcome,
            results,
            metadata: AuditMetadata::from_pages(started_at, Utc::now(), &pages),
            error_message: None,
        };

        if let Some(render) = render {
            let rendered = self
                .advance(&mut status, AuditStatus::GeneratingReport)
                .and_then(|()| render(&report));
            if let Err(e) = rendered {
                self.fail(&mut report, &mut status, e);
                return report;
            }
        }

        if let Err(e) = self.advance(&mut status, AuditStatus::Completed) {
            self.fail(&mut report, &mut status, e);
            return report;
        }
        report.status = status;

        info!(
            "Audit of {} completed: score {:.1} ({} pages, {} checks, {} failed, {} warnings)",
            seed_url,
            outcome.overall_score,
            outcome.pages_crawled,
            outcome.total_checks_run,
            outcome.checks_failed,
            outcome.checks_warning
        );
        report
    }

    /// Moves the audit to failed and records `error` in the report
    fn fail(&self, report: &mut AuditReport, status: &mut AuditStatus, error: AuditError) {
        error!("Audit of {} failed: {}", report.seed_url, error);
        if let Err(transition) = self.advance(status, AuditStatus::Failed) {
            warn!("{}", transition);
            *status = AuditStatus::Failed;
        }
        report.status = *status;
        report.metadata.finished_at = Utc::now();
        report.error_message = Some(error.to_string());
    }

    async fn execute(
        &self,
        seed_url: &str,
        max_pages: usize,
        status: &mut AuditStatus,
    ) -> Result<(Vec<PageRecord>, Vec<CheckResult>), AuditError> {
        self.advance(status, AuditStatus::Crawling)?;

        let cancel = self.crawler.cancellation_token().child_token();
        let _release = cancel.clone().drop_guard();
        if let Some(timeout) = self.audit_timeout {
            let deadline = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = deadline.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        warn!("Audit deadline of {:?} reached, scoring the partial crawl", timeout);
                        deadline.cancel();
                    }
                }
            });
        }

        let observer = Arc::clone(&self.observer);
        let pages = self
            .crawler
            .crawl_until(seed_url, max_pages, &cancel, |url, crawled| {
                observer.on_page(url, crawled, max_pages)
            })
            .await?;

        if pages.is_empty() {
            warn!("Crawl of {} returned no pages, nothing to check", seed_url);
        }

        let site = if self.probe_site && !pages.is_empty() {
            self.crawler.probe_site(seed_url).await?
        } else {
            SiteContext::default()
        };

        self.advance(status, AuditStatus::Analyzing)?;
        let results = self.registry.run(&pages, &site);
        Ok((pages, results))
    }

    fn advance(&self, status: &mut AuditStatus, next: AuditStatus) -> Result<(), AuditError> {
        *status = status.transition(next)?;
        debug!("Audit status: {}", status);
        self.observer.on_status(*status);
        Ok(())
    }
}

/// Audits a site with the default configuration
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), seo_audit::CrawlError> {
/// let report = seo_audit::run_audit("https://example.com", 10).await?;
/// println!("score {:.1}", report.outcome.overall_score);
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(seed_url: &str, max_pages: usize) -> Result<AuditReport, CrawlError> {
    let crawler = Crawler::new(&CrawlerConfig::default(), &UserAgentConfig::default())?;
    Ok(AuditRunner::new(crawler).run_audit(seed_url, max_pages).await)
}
