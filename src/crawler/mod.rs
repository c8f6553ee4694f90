//! Crawler module for web page fetching and processing
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - Lenient HTML parsing into page records
//! - The breadth-first frontier
//! - Overall crawl coordination, cancellation and site-file probing

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{crawl, Crawler};
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, probe_resource, FetchErrorKind,
    FetchResult, FetchedPage,
};
pub use frontier::Frontier;
pub use parser::{parse_page, resolve_link};
