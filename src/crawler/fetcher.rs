//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests with wall-clock timing
//! - Error classification (only network-level failures drop a page)
//! - Probing well-known site files such as robots.txt

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::page::ResourceProbe;
use reqwest::{redirect::Policy, Client};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// A response that produced a document, whatever its status code
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Time from sending the request to having read the body
    pub elapsed: Duration,
}

/// Classification of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Other,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered and the body was read
    Success(FetchedPage),

    /// The server answered with something that is not an HTML document
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, DNS, TLS, ...)
    NetworkError {
        /// Error description
        error: String,
        kind: FetchErrorKind,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts are taken from the crawler configuration
/// * `agent` - The user agent identification
///
/// # Example
///
/// ```no_run
/// use seo_audit::config::{CrawlerConfig, UserAgentConfig};
/// use seo_audit::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page
///
/// | Condition | Result |
/// |-----------|--------|
/// | Any HTTP status with an HTML (or untyped) body | `Success` |
/// | Content-Type present and not HTML/XHTML | `ContentMismatch` |
/// | Timeout | `NetworkError(Timeout)` |
/// | Connection refused, DNS, TLS | `NetworkError(Connect)` |
/// | Redirect loop or more than 10 hops | `NetworkError(Redirect)` |
/// | Body could not be read | `NetworkError(Body)` |
///
/// Non-2xx responses are returned as `Success`; the status is kept in the
/// page and judged by the checks.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let headers = collect_headers(response.headers());
    let content_type = headers.get("content-type").cloned();

    if let Some(ct) = &content_type {
        if !is_html_content_type(ct) {
            return FetchResult::ContentMismatch {
                content_type: ct.clone(),
            };
        }
    }

    match response.text().await {
        Ok(body) => FetchResult::Success(FetchedPage {
            final_url,
            status_code,
            content_type,
            headers,
            body,
            elapsed: started.elapsed(),
        }),
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
            kind: if e.is_timeout() {
                FetchErrorKind::Timeout
            } else {
                FetchErrorKind::Body
            },
        },
    }
}

/// Requests a well-known file such as robots.txt or a sitemap
///
/// A network failure leaves the probe `NotChecked`; the file is only
/// reported `Missing` when the server actually answered.
pub async fn probe_resource(client: &Client, url: &str) -> ResourceProbe {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Probe of {} failed: {}", url, e);
            return ResourceProbe::NotChecked;
        }
    };

    let status = response.status();
    if !status.is_success() {
        return ResourceProbe::Missing(status.as_u16());
    }

    match response.text().await {
        Ok(body) => ResourceProbe::Found(body),
        Err(e) => {
            tracing::debug!("Failed to read body of {}: {}", url, e);
            ResourceProbe::NotChecked
        }
    }
}

/// HTML, XHTML, or anything a browser would render as a document
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.contains("text/html") || ct.contains("application/xhtml")
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            // Repeated headers are joined the way HTTP allows
            out.entry(name.as_str().to_lowercase())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
    }
    out
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let kind = if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_connect() {
        FetchErrorKind::Connect
    } else if e.is_redirect() {
        FetchErrorKind::Redirect
    } else {
        FetchErrorKind::Other
    };

    FetchResult::NetworkError {
        error: e.to_string(),
        kind,
    }
}
