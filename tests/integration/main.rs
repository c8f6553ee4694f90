//! Integration tests against mock sites served by wiremock

mod audit_tests;
mod crawl_tests;

use seo_audit::config::{CrawlerConfig, UserAgentConfig};
use seo_audit::crawler::Crawler;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings for tests: no politeness delay, short timeouts
pub fn test_crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        politeness_delay_ms: 0,
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
        ..CrawlerConfig::default()
    }
}

pub fn test_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    }
}

pub fn test_crawler(config: &CrawlerConfig) -> Crawler {
    Crawler::new(config, &test_agent()).expect("Failed to build crawler")
}

/// A minimal HTML document linking to `links`
pub fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!(
        r#"<html lang="en"><head><title>{title}</title></head><body><h1>{title}</h1><p>Some text.</p>{anchors}</body></html>"#
    )
}

/// Serves `body` as text/html at `route`
pub async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}
