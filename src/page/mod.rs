//! Crawled page data model
//!
//! A [`PageRecord`] is built once per unique normalized URL when the page is
//! fetched. Checks only ever see shared references to it.

mod context;

pub use context::{ResourceProbe, SiteContext};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `<img>` element as found in the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Raw `src` attribute (empty if absent)
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    /// The `loading` attribute, e.g. `lazy`
    pub loading: Option<String>,
}

impl ImageInfo {
    /// Missing, empty and whitespace-only alt text all count as missing
    pub fn has_alt(&self) -> bool {
        self.alt.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    pub fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    pub fn is_lazy(&self) -> bool {
        self.loading
            .as_deref()
            .is_some_and(|l| l.trim().eq_ignore_ascii_case("lazy"))
    }

    /// WebP or AVIF, judged from the source URL
    pub fn is_modern_format(&self) -> bool {
        let src = self.src.to_lowercase();
        src.contains(".webp") || src.contains(".avif")
    }
}

/// Everything extracted from one fetched URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRecord {
    /// Normalized absolute URL (scheme, host, path)
    pub url: String,
    /// Raw response body
    pub html: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    /// Response headers, names lowercased
    pub headers: BTreeMap<String, String>,
    /// Wall-clock fetch duration in seconds, body included
    pub load_time: f64,

    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_robots: Option<String>,
    pub meta_charset: Option<String>,
    /// `<html lang>`
    pub lang: Option<String>,
    /// Viewport meta content
    pub viewport: Option<String>,
    pub has_viewport: bool,
    pub has_https: bool,
    pub canonical: Option<String>,
    pub canonical_count: usize,

    pub h1_tags: Vec<String>,
    pub h2_tags: Vec<String>,
    pub h3_tags: Vec<String>,
    pub h4_h6_count: usize,
    /// Levels of every h1..h6 in document order
    pub heading_levels: Vec<u8>,
    pub paragraphs: Vec<String>,

    pub images: Vec<ImageInfo>,
    pub links: Vec<String>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
    /// Head scripts without async/defer plus head stylesheets
    pub render_blocking_count: usize,
    /// preload, prefetch, preconnect and dns-prefetch hints
    pub resource_hint_count: usize,
    pub hreflang_count: usize,
    pub dom_node_count: usize,
    pub has_breadcrumb_markup: bool,

    /// Visible text (no script, style, noscript or template content)
    pub text: String,
    pub word_count: usize,

    pub og_tags: BTreeMap<String, String>,
    pub twitter_tags: BTreeMap<String, String>,
    /// Raw JSON-LD blocks in document order
    pub schema_markup: Vec<String>,
}

impl PageRecord {
    pub fn first_h1(&self) -> Option<&str> {
        self.h1_tags.first().map(String::as_str)
    }

    /// Case-insensitive search of the raw HTML for any of `needles`
    ///
    /// Needles must already be lowercase.
    pub fn html_contains_any(&self, needles: &[&str]) -> bool {
        let html = self.html.to_lowercase();
        needles.iter().any(|n| html.contains(n))
    }

    /// Case-sensitive search of the raw HTML, used for schema.org type names
    pub fn html_contains(&self, needle: &str) -> bool {
        self.html.contains(needle)
    }

    /// Response header by lowercase name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Size of the response body in bytes
    pub fn html_size(&self) -> usize {
        self.html.len()
    }
}
