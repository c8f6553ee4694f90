//! URL handling module
//!
//! This module provides the crawl identity of a URL (normalization) and the
//! site-scoping rule used to decide which discovered links are followed.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_domain, is_same_site, site_host};
pub use normalize::normalize_url;

use crate::CrawlError;
use url::Url;

/// Validates and normalizes a crawl seed
///
/// The seed must be an absolute http(s) URL with a host. Anything else is
/// rejected before a single request is made.
pub fn parse_seed(seed_url: &str) -> Result<Url, CrawlError> {
    normalize_url(seed_url).map_err(|e| CrawlError::InvalidSeed {
        url: seed_url.to_string(),
        reason: e.to_string(),
    })
}
