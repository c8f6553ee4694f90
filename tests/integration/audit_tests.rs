//! End-to-end audit tests: crawl a mock site, run every check, score and
//! store the report

use crate::{html_page, mount_html, test_crawler, test_crawler_config};
use seo_audit::audit::{AuditObserver, AuditRunner, AuditStatus};
use seo_audit::checks::{CheckRegistry, CheckStatus};
use seo_audit::config::CrawlerConfig;
use seo_audit::output::OutputError;
use seo_audit::storage::{AuditStore, SqliteAuditStore};
use seo_audit::AuditError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    statuses: Mutex<Vec<AuditStatus>>,
    pages: Mutex<Vec<(String, usize, usize)>>,
}

impl AuditObserver for Recorder {
    fn on_status(&self, status: AuditStatus) {
        self.statuses.lock().unwrap().push(status);
    }

    fn on_page(&self, url: &str, crawled: usize, budget: usize) {
        self.pages
            .lock()
            .unwrap()
            .push((url.to_string(), crawled, budget));
    }
}

/// A three page site with robots.txt and a sitemap
async fn mount_site(server: &MockServer) {
    mount_html(server, "/", html_page("Home", &["/about", "/contact"])).await;
    mount_html(server, "/about", html_page("About us", &["/"])).await;
    mount_html(server, "/contact", html_page("Contact", &["/"])).await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow:\nSitemap: {}/sitemap.xml\n",
            server.uri()
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<urlset><url><loc>/</loc></url><url><loc>/about</loc></url><url><loc>/contact</loc></url></urlset>",
        ))
        .mount(server)
        .await;
}

fn find_status(report: &seo_audit::AuditReport, name: &str) -> Option<CheckStatus> {
    report
        .results
        .iter()
        .find(|r| r.check_name == name)
        .map(|r| r.status)
}

#[tokio::test]
async fn test_audit_end_to_end() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let recorder = Arc::new(Recorder::default());
    let runner = AuditRunner::new(test_crawler(&test_crawler_config()))
        .with_observer(recorder.clone());
    let report = runner.run_audit(&server.uri(), 10).await;

    assert!(report.is_completed(), "audit failed: {:?}", report.error_message);
    assert!(report.error_message.is_none());

    let registry = CheckRegistry::standard();
    assert_eq!(report.results.len(), registry.len());
    assert_eq!(report.results.len(), 130);
    assert_eq!(
        report.results.iter().map(|r| r.check_name.as_str()).collect::<Vec<_>>(),
        registry.names()
    );

    let outcome = report.outcome;
    assert_eq!(outcome.pages_crawled, 3);
    assert_eq!(outcome.total_checks_run, 130);
    assert!(outcome.checks_passed + outcome.checks_failed + outcome.checks_warning <= 130);
    assert!((0.0..=100.0).contains(&outcome.overall_score));

    assert_eq!(
        find_status(&report, "Robots.txt missing or misconfigured"),
        Some(CheckStatus::Pass)
    );
    assert_eq!(
        find_status(&report, "Sitemap.xml missing or inaccessible"),
        Some(CheckStatus::Pass)
    );

    assert_eq!(
        *recorder.statuses.lock().unwrap(),
        vec![
            AuditStatus::Crawling,
            AuditStatus::Analyzing,
            AuditStatus::Completed
        ]
    );
    let pages = recorder.pages.lock().unwrap();
    assert_eq!(pages.len(), 3);
    assert!(pages.iter().all(|(_, _, budget)| *budget == 10));
    assert!(report.metadata.finished_at >= report.metadata.started_at);
}

#[tokio::test]
async fn test_audit_reports_missing_site_files() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &[])).await;

    let runner = AuditRunner::new(test_crawler(&test_crawler_config()));
    let report = runner.run_audit(&server.uri(), 5).await;

    assert!(report.is_completed());
    assert_eq!(
        find_status(&report, "Robots.txt missing or misconfigured"),
        Some(CheckStatus::Fail)
    );
    assert_eq!(
        find_status(&report, "Sitemap.xml missing or inaccessible"),
        Some(CheckStatus::Fail)
    );
}

#[tokio::test]
async fn test_audit_without_site_probe() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &[])).await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let runner = AuditRunner::new(test_crawler(&test_crawler_config())).with_site_probe(false);
    let report = runner.run_audit(&server.uri(), 5).await;

    assert!(report.is_completed());
    assert_eq!(
        find_status(&report, "Robots.txt missing or misconfigured"),
        Some(CheckStatus::Info)
    );
}

#[tokio::test]
async fn test_audit_completes_with_zero_score_when_nothing_crawled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let recorder = Arc::new(Recorder::default());
    let runner = AuditRunner::new(test_crawler(&test_crawler_config()))
        .with_observer(recorder.clone());
    let report = runner.run_audit(&server.uri(), 5).await;

    assert!(report.is_completed());
    assert!(report.error_message.is_none());
    assert!(report.results.is_empty());
    assert_eq!(report.outcome.pages_crawled, 0);
    assert_eq!(report.outcome.total_checks_run, 0);
    assert_eq!(report.outcome.overall_score, 0.0);
    assert_eq!(
        *recorder.statuses.lock().unwrap(),
        vec![
            AuditStatus::Crawling,
            AuditStatus::Analyzing,
            AuditStatus::Completed
        ]
    );
}

#[tokio::test]
async fn test_audit_renders_report_before_completing() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let recorder = Arc::new(Recorder::default());
    let runner = AuditRunner::new(test_crawler(&test_crawler_config()))
        .with_observer(recorder.clone());

    let mut rendered = None;
    let report = runner
        .run_audit_with_report(&server.uri(), 10, |report| {
            rendered = Some((report.results.len(), recorder.statuses.lock().unwrap().clone()));
            Ok(())
        })
        .await;

    assert!(report.is_completed());
    let (results, statuses_at_render) = rendered.expect("report was not rendered");
    assert_eq!(results, 130);
    assert_eq!(statuses_at_render.last(), Some(&AuditStatus::GeneratingReport));
    assert_eq!(
        *recorder.statuses.lock().unwrap(),
        vec![
            AuditStatus::Crawling,
            AuditStatus::Analyzing,
            AuditStatus::GeneratingReport,
            AuditStatus::Completed
        ]
    );
}

#[tokio::test]
async fn test_audit_fails_when_report_cannot_be_written() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let recorder = Arc::new(Recorder::default());
    let runner = AuditRunner::new(test_crawler(&test_crawler_config()))
        .with_observer(recorder.clone());
    let report = runner
        .run_audit_with_report(&server.uri(), 10, |_| {
            Err(AuditError::Output(OutputError::Write("disk full".to_string())))
        })
        .await;

    assert_eq!(report.status, AuditStatus::Failed);
    assert!(report.error_message.as_deref().unwrap().contains("disk full"));
    assert_eq!(report.results.len(), 130);
    assert_eq!(
        recorder.statuses.lock().unwrap().last(),
        Some(&AuditStatus::Failed)
    );
}

#[tokio::test]
async fn test_audit_deadline_scores_partial_crawl() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/a"])).await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        politeness_delay_ms: 5_000,
        ..test_crawler_config()
    };
    let runner = AuditRunner::new(test_crawler(&config))
        .with_site_probe(false)
        .with_timeout(Some(Duration::from_millis(300)));

    let started = std::time::Instant::now();
    let report = runner.run_audit(&server.uri(), 10).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(report.is_completed());
    assert_eq!(report.outcome.pages_crawled, 1);

    // The deadline only bounds that audit; the runner is still usable
    assert!(!runner.crawler().cancellation_token().is_cancelled());
}

#[tokio::test]
async fn test_audit_report_is_stored() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let mut store = SqliteAuditStore::new_in_memory().expect("Failed to open store");
    let audit_id = store
        .create_audit(&server.uri(), 10, "test-hash")
        .expect("Failed to create audit");

    let runner = AuditRunner::new(test_crawler(&test_crawler_config()));
    let report = runner.run_audit(&server.uri(), 10).await;
    store
        .save_report(audit_id, &report)
        .expect("Failed to save report");

    let record = store.get_audit(audit_id).expect("Audit not found");
    assert_eq!(record.status, AuditStatus::Completed);
    assert_eq!(record.pages_crawled, 3);
    assert_eq!(record.total_checks, 130);
    assert_eq!(record.overall_score, Some(report.outcome.overall_score));

    let results = store.load_results(audit_id).expect("Failed to load results");
    assert_eq!(results.len(), report.results.len());
    for (stored, original) in results.iter().zip(&report.results) {
        assert_eq!(stored.check_name, original.check_name);
        assert_eq!(stored.status, original.status);
        assert_eq!(stored.impact_score, original.impact_score);
    }

    let history = store.list_audits(5).expect("Failed to list audits");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, audit_id);
}
