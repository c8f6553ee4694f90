//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and run full crawls
//! against them.

use crate::{html_page, mount_html, test_crawler, test_crawler_config};
use seo_audit::config::CrawlerConfig;
use seo_audit::page::ResourceProbe;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Paths of the crawled pages, relative to the mock server
fn crawled_paths(server: &MockServer, urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let base = server.uri();
    urls.into_iter()
        .map(|url| url.trim_start_matches(&base).to_string())
        .collect()
}

#[tokio::test]
async fn test_crawl_breadth_first_order() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/a", "/b"])).await;
    mount_html(&server, "/a", html_page("A", &["/c"])).await;
    mount_html(&server, "/b", html_page("B", &["/d"])).await;
    mount_html(&server, "/c", html_page("C", &[])).await;
    mount_html(&server, "/d", html_page("D", &[])).await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler
        .crawl(&server.uri(), 10)
        .await
        .expect("Crawl failed");

    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/a", "/b", "/c", "/d"]
    );
    assert!(pages.iter().all(|p| p.status_code == 200));
    assert_eq!(pages[0].title.as_deref(), Some("Home"));
}

#[tokio::test]
async fn test_crawl_stops_at_budget() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/a", "/b", "/c"])).await;
    mount_html(&server, "/a", html_page("A", &[])).await;
    mount_html(&server, "/b", html_page("B", &[])).await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler.crawl(&server.uri(), 3).await.expect("Crawl failed");

    assert_eq!(pages.len(), 3);
    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/a", "/b"]
    );
}

#[tokio::test]
async fn test_crawl_visits_url_variants_once() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        html_page("Home", &["/a", "/a/", "/a#top", "/A/../a", "/"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("A", &["/", "/a"]), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_crawl_stays_on_site() {
    let server = MockServer::start().await;
    let port = server.address().port();
    let other_host = format!("http://localhost:{port}/elsewhere");
    mount_html(
        &server,
        "/",
        html_page("Home", &[other_host.as_str(), "https://external.invalid/page"]),
    )
    .await;

    // Same port on a different host name is a different site
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].external_links.len(), 2);
}

#[tokio::test]
async fn test_crawl_keeps_error_pages() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/gone"])).await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(html_page("Not Found", &[]), "text/html"),
        )
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].status_code, 404);
    assert_eq!(pages[1].title.as_deref(), Some("Not Found"));
}

#[tokio::test]
async fn test_crawl_drops_non_html_and_failed_fetches() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        html_page("Home", &["/report.pdf", "/slow", "/ok"]),
    )
    .await;
    mount_html(&server, "/ok", html_page("OK", &[])).await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Slow", &[]), "text/html")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        request_timeout_secs: 1,
        ..test_crawler_config()
    };
    let crawler = test_crawler(&config);
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    // Dropped pages do not use up the budget
    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/ok"]
    );
}

#[tokio::test]
async fn test_crawl_follows_redirects_once() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/old"])).await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("New", &["/new", "/"]), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].title.as_deref(), Some("New"));
}

#[tokio::test]
async fn test_crawl_redirect_target_in_same_batch_kept_once() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/old", "/new", "/other"])).await;
    mount_html(&server, "/new", html_page("New", &[])).await;
    mount_html(&server, "/other", html_page("Other", &[])).await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        max_concurrent_fetches: 4,
        ..test_crawler_config()
    };
    let crawler = test_crawler(&config);
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/old", "/other"]
    );
    let titles: Vec<_> = pages.iter().map(|p| p.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("Home"), Some("New"), Some("Other")]);
}

#[tokio::test]
async fn test_crawl_skipped_redirect_target_frees_budget() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/old", "/new", "/a"])).await;
    mount_html(&server, "/new", html_page("New", &[])).await;
    mount_html(&server, "/a", html_page("A", &[])).await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        max_concurrent_fetches: 2,
        ..test_crawler_config()
    };
    let crawler = test_crawler(&config);
    let pages = crawler.crawl(&server.uri(), 3).await.expect("Crawl failed");

    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/old", "/a"]
    );
}

#[tokio::test]
async fn test_crawl_respects_robots_txt_when_enabled() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/admin/panel", "/public"])).await;
    mount_html(&server, "/public", html_page("Public", &[])).await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin\n"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/panel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        respect_robots_txt: true,
        ..test_crawler_config()
    };
    let crawler = test_crawler(&config);
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert_eq!(
        crawled_paths(&server, pages.iter().map(|p| p.url.clone())),
        vec!["/", "/public"]
    );
}

#[tokio::test]
async fn test_crawl_returns_nothing_when_cancelled_up_front() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let crawler = test_crawler(&test_crawler_config()).with_cancellation(token);
    let pages = crawler.crawl(&server.uri(), 10).await.expect("Crawl failed");

    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_crawl_observer_sees_every_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/", html_page("Home", &["/a"])).await;
    mount_html(&server, "/a", html_page("A", &[])).await;

    let mut seen = Vec::new();
    let crawler = test_crawler(&test_crawler_config());
    let pages = crawler
        .crawl_observed(&server.uri(), 10, |url, count| seen.push((url.to_string(), count)))
        .await
        .expect("Crawl failed");

    assert_eq!(seen.len(), pages.len());
    assert_eq!(seen.last().map(|(_, count)| *count), Some(2));
}

#[tokio::test]
async fn test_probe_site_follows_sitemap_directive() {
    let server = MockServer::start().await;
    let robots = format!(
        "User-agent: *\nDisallow:\nSitemap: {}/maps/pages.xml\n",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(robots.clone()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/maps/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<urlset><url><loc>https://x.com/</loc></url><url><loc>https://x.com/a</loc></url></urlset>",
        ))
        .mount(&server)
        .await;

    let crawler = test_crawler(&test_crawler_config());
    let site = crawler.probe_site(&server.uri()).await.expect("Probe failed");

    assert_eq!(site.robots_txt, ResourceProbe::Found(robots));
    assert_eq!(site.sitemap_url_count(), Some(2));
}

#[tokio::test]
async fn test_probe_site_reports_missing_files() {
    let server = MockServer::start().await;

    let crawler = test_crawler(&test_crawler_config());
    let site = crawler.probe_site(&server.uri()).await.expect("Probe failed");

    assert_eq!(site.robots_txt, ResourceProbe::Missing(404));
    assert_eq!(site.sitemap, ResourceProbe::Missing(404));
    assert!(site.robots().is_none());
}

#[tokio::test]
async fn test_crawl_rejects_bad_input() {
    let crawler = test_crawler(&test_crawler_config());

    assert!(crawler.crawl("ftp://example.com", 5).await.is_err());
    assert!(crawler.crawl("not a url", 5).await.is_err());
    assert!(crawler.crawl("https://example.com", 0).await.is_err());
}
